use crate::core::error::{PlotError, PlotResult};
use crate::core::model::Status;

#[derive(Clone, Debug, PartialEq)]
pub struct ModuleStatus {
    pub module: String,
    pub status: Status,
}

/// Parses a FastQC `summary.txt`: `STATUS<TAB>Module<TAB>File` per line.
pub fn parse_summary(text: &str) -> PlotResult<Vec<ModuleStatus>> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let status = fields.next().unwrap_or_default();
        let module = fields
            .next()
            .ok_or_else(|| PlotError::parse(idx + 1, "missing module name"))?;
        out.push(ModuleStatus {
            module: module.to_string(),
            status: status.parse()?,
        });
    }
    Ok(out)
}
