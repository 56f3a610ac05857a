use crate::core::error::PlotError;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl Status {
    pub fn as_str_upper(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Warn => "WARN",
            Status::Fail => "FAIL",
        }
    }

    /// Column of the status in the status matrix, left to right.
    pub fn column(self) -> usize {
        match self {
            Status::Pass => 0,
            Status::Warn => 1,
            Status::Fail => 2,
        }
    }
}

impl FromStr for Status {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Status::Pass, Status::Warn, Status::Fail]
            .into_iter()
            .find(|status| status.as_str_upper() == s)
            .ok_or_else(|| PlotError::UnknownStatus(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhredOffset {
    Auto,
    Fixed(u8),
}

pub const MAX_Q: usize = 93;

pub type QualHist = [u64; MAX_Q + 1];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_upper_case_only() {
        assert_eq!("PASS".parse::<Status>(), Ok(Status::Pass));
        assert_eq!("WARN".parse::<Status>(), Ok(Status::Warn));
        assert_eq!("FAIL".parse::<Status>(), Ok(Status::Fail));
        assert_eq!(
            "pass".parse::<Status>(),
            Err(PlotError::UnknownStatus("pass".to_string()))
        );
    }

    #[test]
    fn status_columns_are_ordered() {
        assert_eq!(Status::Pass.column(), 0);
        assert_eq!(Status::Warn.column(), 1);
        assert_eq!(Status::Fail.column(), 2);
        assert_eq!(Status::Warn.as_str_upper(), "WARN");
    }
}
