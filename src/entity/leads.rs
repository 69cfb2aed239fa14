use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub segment_id: Option<Uuid>,
    pub event_type: Option<String>,
    pub event_date: Option<Date>,
    pub guest_count: Option<i32>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub service_style: Option<String>,
    pub needs_waitstaff: bool,
    pub needs_tableware: bool,
    pub needs_setup: bool,
    pub cuisine_preference: Option<String>,
    pub delivery_model: Option<String>,
    pub dietary_requirements: Vec<String>,
    pub notes: Option<String>,
    pub internal_notes: Option<String>,
    pub idempotency_key: String,
    pub access_key: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vendor_leads::Entity")]
    VendorLeads,
}

impl Related<super::vendor_leads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorLeads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
