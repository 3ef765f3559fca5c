use sea_orm::entity::prelude::*;

/// A registered user. The plaintext password is never stored; only the
/// argon2 hash lands in `hashed_password`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub hashed_password: String,
    /// Grants cafe create/edit rights.
    pub admin: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_like_cafe::Entity")]
    UserLikeCafe,
}

// Many-to-many to cafes through the likes join table.
impl Related<super::cafe::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_like_cafe::Relation::Cafe.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_like_cafe::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// First and last name joined for display.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
