use super::{CategoryKind, SubCriterion};

/// Fixed sub-criteria splits, as whole percentages of the category points.
const TECHNICAL_SPLIT: &[(&str, u32)] = &[
    ("solution_architecture", 30),
    ("security_compliance", 30),
    ("performance_sla", 25),
    ("scalability", 15),
];

const COST_SPLIT: &[(&str, u32)] = &[
    ("total_cost_ownership", 40),
    ("pricing_model", 36),
    ("payment_terms", 24),
];

const EXPERIENCE_SPLIT: &[(&str, u32)] = &[
    ("company_experience", 40),
    ("project_references", 35),
    ("certifications", 25),
];

const IMPLEMENTATION_SPLIT: &[(&str, u32)] = &[
    ("implementation_methodology", 40),
    ("timeline", 35),
    ("project_management", 25),
];

pub(crate) fn fixed_split(kind: CategoryKind) -> &'static [(&'static str, u32)] {
    match kind {
        CategoryKind::TechnicalCapability => TECHNICAL_SPLIT,
        CategoryKind::CostEffectiveness => COST_SPLIT,
        CategoryKind::VendorExperience => EXPERIENCE_SPLIT,
        CategoryKind::ImplementationApproach => IMPLEMENTATION_SPLIT,
    }
}

/// Allocate `points` across the fixed split, rounding each share down.
///
/// The rounding remainder stays in the category total and is never redistributed.
pub(crate) fn allocate(kind: CategoryKind, points: u32) -> Vec<SubCriterion> {
    fixed_split(kind)
        .iter()
        .map(|(name, percent)| SubCriterion {
            name: (*name).to_string(),
            points: (u64::from(points) * u64::from(*percent) / 100) as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_cover_the_whole_category() {
        for kind in CategoryKind::ALL {
            let total: u32 = fixed_split(kind).iter().map(|(_, percent)| percent).sum();
            assert_eq!(total, 100, "{} split must cover 100%", kind.key());
        }
    }

    #[test]
    fn allocation_rounds_each_share_down() {
        let technical = allocate(CategoryKind::TechnicalCapability, 35);
        let points: Vec<u32> = technical.iter().map(|sub| sub.points).collect();
        assert_eq!(points, vec![10, 10, 8, 5]);

        let cost = allocate(CategoryKind::CostEffectiveness, 25);
        let points: Vec<u32> = cost.iter().map(|sub| sub.points).collect();
        assert_eq!(points, vec![10, 9, 6]);
    }

    #[test]
    fn allocation_never_exceeds_category_points() {
        for kind in CategoryKind::ALL {
            for points in 1..=250 {
                let allocated: u32 = allocate(kind, points).iter().map(|sub| sub.points).sum();
                assert!(allocated <= points);
            }
        }
    }
}
