use sea_orm::entity::prelude::*;

/// Image used when a cafe is created without one.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-cafe.jpg";

/// A cafe in the directory. Belongs to exactly one city.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cafes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub url: String,
    pub address: String,
    pub city_code: String,
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityCode",
        to = "super::city::Column::Code"
    )]
    City,
    #[sea_orm(has_many = "super::user_like_cafe::Entity")]
    UserLikeCafe,
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

// Many-to-many to users through the likes join table.
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_like_cafe::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_like_cafe::Relation::Cafe.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
