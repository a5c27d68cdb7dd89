use serde_json::json;

use super::serve::open_store;
use crate::cli::OutputFormat;
use crate::services::UserService;

pub async fn handle(email: &str, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store().await?;
    let user = UserService::new(store)
        .create_superuser(email, password)
        .await
        .map_err(|e| match e {
            crate::services::ServiceError::Validation(fields) => {
                let details: Vec<String> = fields.into_iter().map(|(k, v)| format!("{k}: {v}")).collect();
                anyhow::anyhow!("invalid superuser: {}", details.join(", "))
            }
            other => anyhow::Error::new(other),
        })?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "id": user.id, "email": user.email, "is_staff": user.is_staff, "is_superuser": user.is_superuser })
        ),
        OutputFormat::Text => println!("Superuser created: {} ({})", user.email, user.id),
    }
    Ok(())
}
