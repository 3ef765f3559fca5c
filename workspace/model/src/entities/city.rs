use sea_orm::entity::prelude::*;

/// A city that cafes belong to.
/// Immutable reference data, seeded independently of cafes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    /// Short city code used as the primary key, e.g. "sf".
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    /// Two-letter state code.
    pub state: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A city can hold multiple cafes.
    #[sea_orm(has_many = "super::cafe::Entity")]
    Cafe,
}

impl Related<super::cafe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cafe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Return "City, ST" for display next to a cafe.
    pub fn city_state(&self) -> String {
        format!("{}, {}", self.name, self.state)
    }
}
