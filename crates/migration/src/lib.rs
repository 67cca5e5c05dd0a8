pub use sea_orm_migration::prelude::*;

mod m20260712_094500_init;
mod m20260801_101500_invites;
mod m20260810_083000_goals;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260712_094500_init::Migration),
            Box::new(m20260801_101500_invites::Migration),
            Box::new(m20260810_083000_goals::Migration),
        ]
    }
}
