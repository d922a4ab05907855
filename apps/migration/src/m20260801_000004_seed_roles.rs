//! Seed the two content roles the policy layer recognizes.

use sea_orm_migration::prelude::*;

use super::m20260801_000001_create_users_and_roles::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let insert = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Name])
            .values_panic(["admin".into()])
            .values_panic(["writer".into()])
            .to_owned();

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Roles::Table)
            .cond_where(Expr::col(Roles::Name).is_in(["admin", "writer"]))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
