use crate::cli::Command;
use shortlink_storage::{Alias, MappingStore, ReadStore, StoreError, Target};
use std::io::Write;

/// Process exit code for a failed command.
///
/// Caller mistakes get distinct codes so scripts can tell them apart from
/// storage failures.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::Validation(_)) => 2,
        Some(StoreError::DuplicateAlias(_)) => 3,
        Some(StoreError::NotFound(_)) => 4,
        Some(StoreError::Storage(_)) | None => 1,
    }
}

/// Runs one command against an initialized store, writing results to `out`.
pub async fn execute<S, W>(
    store: &S,
    command: Command,
    base_url: Option<&str>,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: MappingStore,
    W: Write,
{
    match command {
        Command::Init => {
            writeln!(out, "database ready")?;
        }
        Command::Create { alias, target } => {
            let alias = Alias::new(alias)?;
            let target = Target::new(target)?;
            let id = store.insert(&alias, &target).await?;

            match base_url {
                Some(base_url) => writeln!(out, "{}\t{}", id, alias.to_url(base_url))?,
                None => writeln!(out, "{}", id)?,
            }
        }
        Command::Lookup { alias } => {
            let target = store.lookup(&alias).await?;
            writeln!(out, "{}", target)?;
        }
        Command::List { json } => {
            for record in store.list().await? {
                if json {
                    writeln!(out, "{}", serde_json::to_string(&record)?)?;
                } else {
                    writeln!(out, "{}\t{}\t{}", record.id, record.alias, record.target)?;
                }
            }
        }
        Command::Delete { alias } => {
            let alias = Alias::new(alias)?;
            if !store.delete(&alias).await? {
                return Err(StoreError::NotFound(alias.to_string()).into());
            }
            writeln!(out, "deleted {}", alias)?;
        }
    }

    Ok(())
}
