//! # Material Grade and Elastic Modulus
//!
//! Steel grade is not stored as its own column in the catalog, so it is
//! recovered from naming conventions. Two conventions exist:
//!
//! - **Series**: the digits of the series identifier are the grade in tens of
//!   MPa (series `C35` is grade 350).
//! - **Description**: the member description carries a `(GRnnn)` token
//!   (`310UB46.2 (GR300)` is grade 300).
//!
//! Neither convention ever fails; when no grade can be recovered the result
//! is [`Grade::Unknown`].
//!
//! ## Example
//!
//! ```rust
//! use catalog_core::grade::{Grade, GradePolicy, Modulus, ModulusPolicy};
//!
//! let grade = GradePolicy::Description.derive("UB310", "310UB46.2 (GR300)");
//! assert_eq!(grade, Grade::Known("300".to_string()));
//! assert_eq!(ModulusPolicy::GradeTable.modulus(&grade), Modulus::Mpa(200_000.0));
//! ```

use serde::{Deserialize, Serialize};

/// Elastic modulus of structural steel (MPa)
pub const STEEL_E_MPA: f64 = 200_000.0;

/// Grades with a tabulated modulus
const GRADE_MODULUS_MPA: [(&str, f64); 3] = [
    ("250", STEEL_E_MPA),
    ("300", STEEL_E_MPA),
    ("350", STEEL_E_MPA),
];

/// Opening marker of a grade token inside a member description
const GRADE_TOKEN_OPEN: &str = "(GR";

/// How the material grade of a member is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradePolicy {
    /// Digits of the series identifier, times ten
    Series,
    /// `(GRnnn)` token in the member description
    #[default]
    Description,
}

impl GradePolicy {
    /// Derive the grade for a member of a series.
    pub fn derive(&self, series: &str, description: &str) -> Grade {
        match self {
            GradePolicy::Series => grade_from_series(series),
            GradePolicy::Description => grade_from_description(description),
        }
    }
}

/// How the elastic modulus is derived from a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModulusPolicy {
    /// 200 000 MPa regardless of grade
    Fixed,
    /// Looked up from the grade table; unlisted grades are unknown
    #[default]
    #[serde(rename = "table")]
    GradeTable,
}

impl ModulusPolicy {
    /// Elastic modulus for a grade under this policy.
    pub fn modulus(&self, grade: &Grade) -> Modulus {
        match self {
            ModulusPolicy::Fixed => Modulus::Mpa(STEEL_E_MPA),
            ModulusPolicy::GradeTable => match grade {
                Grade::Known(token) => GRADE_MODULUS_MPA
                    .iter()
                    .find(|(g, _)| *g == token.as_str())
                    .map(|(_, e)| Modulus::Mpa(*e))
                    .unwrap_or(Modulus::Unknown),
                Grade::Unknown => Modulus::Unknown,
            },
        }
    }
}

/// Material grade of a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    /// Grade token, e.g. "300"
    Known(String),
    /// No grade could be recovered
    Unknown,
}

impl Grade {
    pub fn is_known(&self) -> bool {
        matches!(self, Grade::Known(_))
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::Known(token) => write!(f, "{}", token),
            Grade::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Elastic modulus of a member
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Modulus {
    /// Modulus in MPa
    Mpa(f64),
    /// Grade not in the modulus table
    Unknown,
}

impl Modulus {
    pub fn mpa(&self) -> Option<f64> {
        match self {
            Modulus::Mpa(e) => Some(*e),
            Modulus::Unknown => None,
        }
    }
}

impl std::fmt::Display for Modulus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modulus::Mpa(e) => write!(f, "{} MPa", e),
            Modulus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Concatenate the digits of a series identifier and scale by ten.
fn grade_from_series(series: &str) -> Grade {
    let digits: String = series.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(10))
        .map(|g| Grade::Known(g.to_string()))
        .unwrap_or(Grade::Unknown)
}

/// Extract the token between the last `(GR` and the following `)`.
fn grade_from_description(description: &str) -> Grade {
    let Some(start) = description.rfind(GRADE_TOKEN_OPEN) else {
        return Grade::Unknown;
    };
    let rest = &description[start + GRADE_TOKEN_OPEN.len()..];
    let token = rest.split(')').next().unwrap_or("").trim();

    if token.is_empty() {
        Grade::Unknown
    } else {
        Grade::Known(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_grade() {
        assert_eq!(grade_from_series("C35"), Grade::Known("350".to_string()));
        assert_eq!(grade_from_series("UB30"), Grade::Known("300".to_string()));
        assert_eq!(grade_from_series("SHS"), Grade::Unknown);
        assert_eq!(grade_from_series(""), Grade::Unknown);
    }

    #[test]
    fn test_series_grade_overflow_is_unknown() {
        assert_eq!(grade_from_series("X99999999999999999999"), Grade::Unknown);
    }

    #[test]
    fn test_description_grade() {
        assert_eq!(
            grade_from_description("310UB46.2 (GR300)"),
            Grade::Known("300".to_string())
        );
        assert_eq!(
            grade_from_description("150PFC (GR 350 )"),
            Grade::Known("350".to_string())
        );
        assert_eq!(grade_from_description("310UB46.2"), Grade::Unknown);
        assert_eq!(grade_from_description("310UB46.2 (GR)"), Grade::Unknown);
    }

    #[test]
    fn test_description_grade_uses_last_token() {
        assert_eq!(
            grade_from_description("(GR250) relabelled (GR350)"),
            Grade::Known("350".to_string())
        );
    }

    #[test]
    fn test_modulus_policies() {
        let g300 = Grade::Known("300".to_string());
        let g450 = Grade::Known("450".to_string());

        assert_eq!(ModulusPolicy::GradeTable.modulus(&g300), Modulus::Mpa(200_000.0));
        assert_eq!(ModulusPolicy::GradeTable.modulus(&g450), Modulus::Unknown);
        assert_eq!(ModulusPolicy::GradeTable.modulus(&Grade::Unknown), Modulus::Unknown);

        assert_eq!(ModulusPolicy::Fixed.modulus(&g450), Modulus::Mpa(200_000.0));
        assert_eq!(ModulusPolicy::Fixed.modulus(&Grade::Unknown), Modulus::Mpa(200_000.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Grade::Unknown.to_string(), "Unknown");
        assert_eq!(Grade::Known("300".to_string()).to_string(), "300");
        assert_eq!(Modulus::Mpa(200_000.0).to_string(), "200000 MPa");
        assert_eq!(Modulus::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_policy_serialization() {
        assert_eq!(serde_json::to_string(&GradePolicy::Series).unwrap(), "\"series\"");
        assert_eq!(serde_json::to_string(&ModulusPolicy::GradeTable).unwrap(), "\"table\"");
    }
}
