use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub vendor_lead_id: Uuid,
    pub total_price: i64,
    pub price_per_person: Option<i64>,
    pub message: Option<String>,
    pub valid_until: DateTimeWithTimeZone,
    pub status: String,
    pub sent_at: Option<DateTimeWithTimeZone>,
    pub viewed_at: Option<DateTimeWithTimeZone>,
    pub responded_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor_leads::Entity",
        from = "Column::VendorLeadId",
        to = "super::vendor_leads::Column::Id"
    )]
    VendorLead,
}

impl Related<super::vendor_leads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorLead.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
