use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single raw entry of a server-provided series.
///
/// Absent and non-numeric entries coerce to `0.0`. Numeric strings parse,
/// since the backend serializes some figures (e.g. `bac`) as text. The
/// returned value may still be negative or non-finite; clamping those is the
/// normalizer's job.
pub trait Sample {
    fn coerce(&self) -> f64;
}

impl Sample for f64 {
    fn coerce(&self) -> f64 {
        *self
    }
}

impl Sample for Option<f64> {
    fn coerce(&self) -> f64 {
        self.unwrap_or(0.0)
    }
}

impl Sample for Value {
    fn coerce(&self) -> f64 {
        match self {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
            _ => 0.0,
        }
    }
}

/// One month of verified client billing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyBilling {
    #[serde(default)]
    pub mes: Option<String>,
    #[serde(default)]
    pub total: Value,
    #[serde(default)]
    pub amount: Value,
}

impl MonthlyBilling {
    pub fn total(&self) -> f64 {
        finite_or_zero(self.total.coerce())
    }

    pub fn amount(&self) -> f64 {
        finite_or_zero(self.amount.coerce())
    }
}

/// Declared cost split of the project budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(default)]
    pub materiales: Value,
    #[serde(default)]
    pub servicios: Value,
    #[serde(default)]
    pub subcontratado: Value,
    #[serde(default)]
    pub gastos: Value,
    #[serde(default)]
    pub total: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoursEntry {
    #[serde(default)]
    pub hours: Value,
}

/// The data blob the dashboard backend renders for one project.
///
/// Every field is optional; missing or `null` arrays deserialize empty and
/// missing scalars as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardBlob {
    #[serde(deserialize_with = "null_as_default")]
    pub meses: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub pv: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub ev: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub ac: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub ac_paid: Vec<Value>,

    #[serde(deserialize_with = "null_as_default")]
    pub semanas_labels: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub semanas_pv: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub semanas_ev: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub semanas_ac: Vec<Value>,

    #[serde(deserialize_with = "null_as_default")]
    pub dias_labels: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub dias_pv: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub dias_ev: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub dias_ac: Vec<Value>,

    pub bac: Value,
    pub cpi: Value,
    pub spi: Value,

    #[serde(alias = "bacPlaneado")]
    pub bac_planeado: Value,
    #[serde(alias = "bacReal")]
    pub bac_real: Value,
    #[serde(alias = "contractAmount")]
    pub contract_amount: Value,
    #[serde(alias = "facturadoClienteTotal")]
    pub facturado_cliente_total: Value,
    #[serde(alias = "facturacionMensual", deserialize_with = "null_as_default")]
    pub facturacion_mensual: Vec<MonthlyBilling>,
    #[serde(alias = "costData", deserialize_with = "null_as_default")]
    pub cost_data: CostBreakdown,
    #[serde(alias = "horasData", deserialize_with = "null_as_default")]
    pub horas_data: Vec<HoursEntry>,
}

impl DashboardBlob {
    pub fn month_labels(&self) -> Vec<String> {
        labels_to_strings(&self.meses)
    }

    pub fn refs(&self) -> BudgetRefs {
        BudgetRefs {
            bac_planned: finite_or_zero(self.bac_planeado.coerce()),
            bac_real: finite_or_zero(self.bac_real.coerce()),
            bac: finite_or_zero(self.bac.coerce()),
            contract_amount: finite_or_zero(self.contract_amount.coerce()),
            invoiced_total: finite_or_zero(self.facturado_cliente_total.coerce()),
        }
    }
}

/// Scalar budget references carried next to the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetRefs {
    pub bac_planned: f64,
    pub bac_real: f64,
    pub bac: f64,
    pub contract_amount: f64,
    pub invoiced_total: f64,
}

pub fn labels_to_strings(raw: &[Value]) -> Vec<String> {
    raw.iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
