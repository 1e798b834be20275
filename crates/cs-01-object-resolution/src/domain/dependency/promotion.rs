use super::DependencyResolver;
use crate::ports::outbound::CatalogLookup;
use shared_types::{CatalogObject, ObjectKind, ObjectSet, RuleParameter, RuleParameterKey};
use std::sync::Arc;
use tracing::debug;

/// Promotion rule edges: catalog objects referenced by code in the rule
/// parameters.
///
/// Codes that no longer resolve are skipped.
pub struct PromotionRuleDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl PromotionRuleDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }

    fn lookup(&self, parameter: &RuleParameter) -> Option<CatalogObject> {
        let code = parameter.value.as_str();
        match parameter.key {
            RuleParameterKey::BrandCode => self
                .catalog
                .find_brand_by_code(code)
                .map(CatalogObject::Brand),
            RuleParameterKey::CategoryCode => self
                .catalog
                .find_category_by_code(code)
                .map(CatalogObject::Category),
            RuleParameterKey::ProductCode => self.catalog.find_product_by_code(code),
            RuleParameterKey::SkuCode => self
                .catalog
                .find_sku_by_code(code)
                .map(CatalogObject::ProductSku),
            RuleParameterKey::DiscountAmount | RuleParameterKey::DiscountPercent => None,
        }
    }
}

impl DependencyResolver for PromotionRuleDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::PromotionRule
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        let CatalogObject::PromotionRule(rule) = object else {
            return deps;
        };

        for parameter in &rule.parameters {
            match self.lookup(parameter) {
                Some(found) => {
                    deps.insert(found);
                }
                None if !matches!(
                    parameter.key,
                    RuleParameterKey::DiscountAmount | RuleParameterKey::DiscountPercent
                ) =>
                {
                    debug!(
                        rule = %rule.guid,
                        key = ?parameter.key,
                        code = %parameter.value,
                        "Promotion rule references an unknown code"
                    );
                }
                None => {}
            }
        }
        deps
    }
}
