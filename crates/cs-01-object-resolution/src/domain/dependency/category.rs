use super::DependencyResolver;
use crate::ports::outbound::CatalogLookup;
use shared_types::{CatalogObject, ObjectKind, ObjectSet};
use std::sync::Arc;

/// Category hierarchy edges.
///
/// A linked category depends on its master only. Any other category depends
/// on its parent, when it has one.
pub struct CategoryDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl CategoryDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }
}

impl DependencyResolver for CategoryDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::Category
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        let CatalogObject::Category(category) = object else {
            return deps;
        };

        if let Some(master) = &category.master {
            deps.insert(CatalogObject::Category(master.clone()));
        } else if let Some(parent) = &category.parent {
            deps.insert(CatalogObject::Category(parent.clone()));
        }
        deps
    }
}

/// Category type edge of a non-linked category.
pub struct CategoryTypeDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl CategoryTypeDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }
}

impl DependencyResolver for CategoryTypeDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::Category
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        if let CatalogObject::Category(category) = object {
            if !category.is_linked() {
                if let Some(category_type) = &category.category_type {
                    deps.insert(CatalogObject::CategoryType(category_type.clone()));
                }
            }
        }
        deps
    }
}
