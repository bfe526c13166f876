//! `termforge db reset` — drop every table. Destructive, gated on `--yes`.

use termforge_storage::reset_schema;

use crate::connect_storage;

pub(crate) async fn run(yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("refusing to drop the schema without --yes");
    }
    let storage = connect_storage().await?;
    reset_schema(storage.pool()).await?;
    println!("schema dropped");
    Ok(())
}
