use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub book_id: Uuid,
    pub name: String,
    pub job: Option<String>,
    pub corporation: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub memo: Option<String>,
    pub leader_id: Option<Uuid>,
    pub pic_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contact::Entity")]
    Contact,
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Customer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            book_id: model.book_id,
            name: model.name,
            job: model.job,
            corporation: model.corporation,
            address: model.address,
            memo: model.memo,
            leader_id: model.leader_id,
            pic_id: model.pic_id,
            created_at: model.created_at.into(),
        }
    }
}
