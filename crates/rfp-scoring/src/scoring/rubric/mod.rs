mod shape;
mod splits;

use serde::Serialize;
use tracing::{debug, warn};

use super::input::RawInput;

/// The four fixed scoring dimensions every rubric is repaired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    TechnicalCapability,
    CostEffectiveness,
    VendorExperience,
    ImplementationApproach,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 4] = [
        CategoryKind::TechnicalCapability,
        CategoryKind::CostEffectiveness,
        CategoryKind::VendorExperience,
        CategoryKind::ImplementationApproach,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            CategoryKind::TechnicalCapability => "technical_capability",
            CategoryKind::CostEffectiveness => "cost_effectiveness",
            CategoryKind::VendorExperience => "vendor_experience",
            CategoryKind::ImplementationApproach => "implementation_approach",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CategoryKind::TechnicalCapability => "Technical capability",
            CategoryKind::CostEffectiveness => "Cost effectiveness",
            CategoryKind::VendorExperience => "Vendor experience",
            CategoryKind::ImplementationApproach => "Implementation approach",
        }
    }

    /// Name of the vendor feature bucket scored against this category.
    pub const fn bucket_key(self) -> &'static str {
        match self {
            CategoryKind::TechnicalCapability => "technical_data",
            CategoryKind::CostEffectiveness => "financial_data",
            CategoryKind::VendorExperience => "vendor_data",
            CategoryKind::ImplementationApproach => "implementation_data",
        }
    }

    pub const fn default_points(self) -> u32 {
        match self {
            CategoryKind::TechnicalCapability => 35,
            CategoryKind::CostEffectiveness => 25,
            CategoryKind::VendorExperience => 20,
            CategoryKind::ImplementationApproach => 20,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Map a free-form criterion name onto a category by substring.
    ///
    /// Checks run in a fixed order, so "Implementation Solution" lands on technical.
    pub fn classify_name(normalized_name: &str) -> Option<Self> {
        let name = normalized_name;
        if name.contains("technical") || name.contains("solution") {
            Some(CategoryKind::TechnicalCapability)
        } else if name.contains("cost") || name.contains("financial") {
            Some(CategoryKind::CostEffectiveness)
        } else if name.contains("vendor") || name.contains("experience") {
            Some(CategoryKind::VendorExperience)
        } else if name.contains("implementation") {
            Some(CategoryKind::ImplementationApproach)
        } else {
            None
        }
    }
}

/// Named share of a category's points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCriterion {
    pub name: String,
    pub points: u32,
}

/// Where a category's sub-criteria allocation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    Fixed,
    Explicit,
}

/// One canonical category of the rubric with its point budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRubric {
    pub category: CategoryKind,
    pub points: u32,
    pub sub_criteria: Vec<SubCriterion>,
    pub split: SplitSource,
}

impl CategoryRubric {
    pub fn new(category: CategoryKind, points: u32) -> Self {
        Self {
            category,
            points,
            sub_criteria: splits::allocate(category, points),
            split: SplitSource::Fixed,
        }
    }

    pub fn standard(category: CategoryKind) -> Self {
        Self::new(category, category.default_points())
    }

    /// Replace the fixed split with caller-supplied allocations, if they fit the budget.
    pub(crate) fn with_explicit_split(mut self, sub_criteria: Vec<SubCriterion>) -> Self {
        let allocated: u64 = sub_criteria.iter().map(|sub| u64::from(sub.points)).sum();
        if sub_criteria.is_empty() || allocated > u64::from(self.points) {
            debug!(
                category = self.category.key(),
                allocated,
                points = self.points,
                "explicit sub-criteria rejected; keeping fixed split"
            );
            return self;
        }

        self.sub_criteria = sub_criteria;
        self.split = SplitSource::Explicit;
        self
    }

    pub fn allocated_points(&self) -> u32 {
        self.sub_criteria
            .iter()
            .fold(0u32, |total, sub| total.saturating_add(sub.points))
    }

    pub fn sub_criterion(&self, name: &str) -> Option<&SubCriterion> {
        self.sub_criteria.iter().find(|sub| sub.name == name)
    }
}

/// Criteria-list entry that did not map onto a canonical category.
///
/// Kept for auditability only; it never contributes to scored totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplementaryCategory {
    pub key: String,
    pub points: u32,
    pub sub_criteria: Vec<SubCriterion>,
}

/// How the normalizer interpreted its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RubricSource {
    CategoryMap,
    CriteriaList,
    Default { reason: String },
}

/// Canonical four-category rubric used by every scorer in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rubric {
    categories: Vec<CategoryRubric>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    supplementary: Vec<SupplementaryCategory>,
    source: RubricSource,
}

impl Rubric {
    /// The 35/25/20/20 rubric with fixed sub-criteria splits.
    pub fn standard() -> Self {
        Self::fallback("no rubric supplied")
    }

    pub(crate) fn fallback(reason: impl Into<String>) -> Self {
        Self::from_categories(
            CategoryKind::ALL.map(CategoryRubric::standard),
            Vec::new(),
            RubricSource::Default {
                reason: reason.into(),
            },
        )
    }

    /// Build a rubric from per-category point values, using the fixed splits.
    pub fn with_points(technical: u32, cost: u32, experience: u32, implementation: u32) -> Self {
        Self::from_categories(
            [
                CategoryRubric::new(CategoryKind::TechnicalCapability, technical.max(1)),
                CategoryRubric::new(CategoryKind::CostEffectiveness, cost.max(1)),
                CategoryRubric::new(CategoryKind::VendorExperience, experience.max(1)),
                CategoryRubric::new(CategoryKind::ImplementationApproach, implementation.max(1)),
            ],
            Vec::new(),
            RubricSource::CategoryMap,
        )
    }

    pub(crate) fn from_categories(
        categories: [CategoryRubric; 4],
        supplementary: Vec<SupplementaryCategory>,
        source: RubricSource,
    ) -> Self {
        Self {
            categories: categories.into(),
            supplementary,
            source,
        }
    }

    pub fn category(&self, kind: CategoryKind) -> &CategoryRubric {
        &self.categories[kind.index()]
    }

    pub fn categories(&self) -> &[CategoryRubric] {
        &self.categories
    }

    pub fn supplementary(&self) -> &[SupplementaryCategory] {
        &self.supplementary
    }

    pub fn source(&self) -> &RubricSource {
        &self.source
    }

    /// Points available across the four scored categories.
    pub fn total_points(&self) -> u32 {
        self.categories
            .iter()
            .fold(0u32, |total, category| total.saturating_add(category.points))
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}

/// Interpret a rubric of unknown shape, repairing it to the canonical four categories.
///
/// Never fails: input that cannot be interpreted yields the default rubric.
pub fn normalize_rubric(raw: impl Into<RawInput>) -> Rubric {
    let raw = raw.into();
    let value = match raw.into_value() {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "rubric is not structured data; using default rubric");
            return Rubric::fallback(format!("rubric could not be parsed: {err}"));
        }
    };

    let rubric = shape::resolve(shape::classify(value));
    debug!(
        source = ?rubric.source(),
        total_points = rubric.total_points(),
        supplementary = rubric.supplementary().len(),
        "rubric normalized"
    );
    rubric
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rubric_totals_one_hundred() {
        let rubric = Rubric::standard();
        assert_eq!(rubric.total_points(), 100);
        assert_eq!(rubric.categories().len(), 4);
        for (index, kind) in CategoryKind::ALL.into_iter().enumerate() {
            assert_eq!(rubric.categories()[index].category, kind);
            assert_eq!(rubric.category(kind).points, kind.default_points());
        }
    }

    #[test]
    fn classify_name_follows_check_order() {
        assert_eq!(
            CategoryKind::classify_name("technical_solution"),
            Some(CategoryKind::TechnicalCapability)
        );
        assert_eq!(
            CategoryKind::classify_name("implementation_solution"),
            Some(CategoryKind::TechnicalCapability)
        );
        assert_eq!(
            CategoryKind::classify_name("financial_strength"),
            Some(CategoryKind::CostEffectiveness)
        );
        assert_eq!(
            CategoryKind::classify_name("past_experience"),
            Some(CategoryKind::VendorExperience)
        );
        assert_eq!(
            CategoryKind::classify_name("implementation_plan"),
            Some(CategoryKind::ImplementationApproach)
        );
        assert_eq!(CategoryKind::classify_name("sustainability"), None);
    }

    #[test]
    fn explicit_split_must_fit_the_budget() {
        let fits = CategoryRubric::new(CategoryKind::CostEffectiveness, 25).with_explicit_split(
            vec![
                SubCriterion {
                    name: "licensing".to_string(),
                    points: 15,
                },
                SubCriterion {
                    name: "support".to_string(),
                    points: 10,
                },
            ],
        );
        assert_eq!(fits.split, SplitSource::Explicit);
        assert_eq!(fits.allocated_points(), 25);

        let overflow = CategoryRubric::new(CategoryKind::CostEffectiveness, 25)
            .with_explicit_split(vec![SubCriterion {
                name: "licensing".to_string(),
                points: 30,
            }]);
        assert_eq!(overflow.split, SplitSource::Fixed);
        assert_eq!(overflow.allocated_points(), 25);
    }
}
