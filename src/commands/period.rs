use crate::commands::Out;
use crate::model::Period;

/// Reports the sheet that requests for `period` are written to.
pub fn period(period: &Period) -> Out<Period> {
    Out::new(period.label(), period.clone())
}
