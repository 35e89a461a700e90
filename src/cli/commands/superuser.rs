use crate::config::Config;
use crate::models::AccountExtra;
use crate::state::SharedState;

pub async fn cmd_create_superuser(
    config: Config,
    email: &str,
    password: &str,
    name: Option<String>,
) -> anyhow::Result<()> {
    let min_length = config.security.min_password_length;
    if password.chars().count() < min_length {
        anyhow::bail!("Password must be at least {min_length} characters");
    }

    let state = SharedState::new(config).await?;
    let accounts = &state.account_service;

    let account = match name {
        None => accounts.create_superuser(email, password).await?,
        Some(name) => {
            accounts
                .create_user(
                    Some(email),
                    password,
                    AccountExtra {
                        name: Some(name),
                        is_staff: true,
                        is_superuser: true,
                    },
                )
                .await?
        }
    };

    println!("Superuser {} created (id {})", account.email, account.id);
    Ok(())
}
