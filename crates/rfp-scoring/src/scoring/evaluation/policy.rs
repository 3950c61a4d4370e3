use serde::Serialize;

use super::config::ScoringPolicy;

/// Letter grade for a vendor's overall percentage. `F` marks a scoring failure only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    F,
}

impl Grade {
    pub const fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        }
    }
}

/// How strongly the assessment backs its recommended vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
}

impl ConfidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
        }
    }
}

pub(crate) fn grade_for(overall_percentage: f64, policy: &ScoringPolicy) -> Grade {
    if overall_percentage >= policy.grade_a_threshold {
        Grade::A
    } else if overall_percentage >= policy.grade_b_threshold {
        Grade::B
    } else {
        Grade::C
    }
}

pub(crate) fn confidence_for(winning_percentage: f64, policy: &ScoringPolicy) -> ConfidenceLevel {
    if winning_percentage >= policy.high_confidence_threshold {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries_are_inclusive() {
        let policy = ScoringPolicy::default();
        assert_eq!(grade_for(100.0, &policy), Grade::A);
        assert_eq!(grade_for(90.0, &policy), Grade::A);
        assert_eq!(grade_for(89.99, &policy), Grade::B);
        assert_eq!(grade_for(80.0, &policy), Grade::B);
        assert_eq!(grade_for(79.99, &policy), Grade::C);
        assert_eq!(grade_for(0.0, &policy), Grade::C);
    }

    #[test]
    fn confidence_is_high_from_eighty_percent() {
        let policy = ScoringPolicy::default();
        assert_eq!(confidence_for(80.0, &policy), ConfidenceLevel::High);
        assert_eq!(confidence_for(79.99, &policy), ConfidenceLevel::Medium);
    }
}
