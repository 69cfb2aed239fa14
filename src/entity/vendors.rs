use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub avg_price_per_person: Option<i64>,
    pub min_guest_count: Option<i32>,
    pub max_guest_count: Option<i32>,
    pub city_id: Uuid,
    pub district_id: Option<Uuid>,
    pub status: String,
    pub is_open_24_7: bool,
    pub has_refrigerated_transport: bool,
    pub is_halal_certified: bool,
    pub offers_free_tasting: bool,
    pub offers_free_delivery: bool,
    pub accepts_last_minute: bool,
    pub serves_outside_city: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::vendor_images::Entity")]
    Images,
    #[sea_orm(has_many = "super::vendor_packages::Entity")]
    Packages,
    #[sea_orm(has_many = "super::vendor_leads::Entity")]
    VendorLeads,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::vendor_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::vendor_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Packages.def()
    }
}

impl Related<super::vendor_leads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorLeads.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
