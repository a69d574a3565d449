use sea_orm_migration::prelude::*;

mod m0001_create_books;
mod m0002_create_clothing;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0001_create_books::Migration),
            Box::new(m0002_create_clothing::Migration),
        ]
    }

    // Each module tracks its own migrations; the accounts module shares the
    // same database.
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("catalog_migrations").into_iden()
    }
}
