use std::path::PathBuf;

use reqwest::Method;
use spurgo_api_types::{EdgeSettingsUpdateRequest, EdgeSettingsView};

use crate::args::SettingsCmd;
use crate::client::{CliError, Ctx};
use crate::io::{read_opt_value, to_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: SettingsCmd) -> Result<(), CliError> {
    match cmd {
        SettingsCmd::Show => show(ctx).await,
        SettingsCmd::Set {
            secret_id,
            secret_key_file,
            zone_id,
            default_host,
        } => set(ctx, secret_id, secret_key_file, zone_id, default_host).await,
    }
}

async fn show(ctx: &Ctx) -> Result<(), CliError> {
    let res: EdgeSettingsView = ctx.request(Method::GET, "admin/settings", None, None).await?;
    print_json(&res)
}

async fn set(
    ctx: &Ctx,
    secret_id: Option<String>,
    secret_key_file: Option<PathBuf>,
    zone_id: Option<String>,
    default_host: Option<String>,
) -> Result<(), CliError> {
    let secret_key_env = std::env::var("SPURGO_EDGE_SECRET_KEY")
        .ok()
        .filter(|value| !value.trim().is_empty());
    let secret_key = read_opt_value(secret_key_env, secret_key_file)?;
    let update = EdgeSettingsUpdateRequest {
        secret_id,
        secret_key,
        zone_id,
        default_host,
    };

    if update.secret_id.is_none()
        && update.secret_key.is_none()
        && update.zone_id.is_none()
        && update.default_host.is_none()
    {
        return Err(CliError::InvalidInput(
            "nothing to update; pass at least one field".into(),
        ));
    }

    let res: EdgeSettingsView = ctx
        .request(Method::PUT, "admin/settings", None, Some(to_value(update)?))
        .await?;
    print_json(&res)
}
