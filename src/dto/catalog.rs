use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::TaxonomyItem;

#[derive(Debug, Serialize, ToSchema)]
pub struct CityWithDistricts {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub districts: Vec<TaxonomyItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceGroupWithServices {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub services: Vec<TaxonomyItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagGroupWithTags {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub tags: Vec<TaxonomyItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaxonomyList {
    pub items: Vec<TaxonomyItem>,
}
