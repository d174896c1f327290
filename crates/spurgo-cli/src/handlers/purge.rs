use reqwest::Method;
use spurgo_api_types::{ConfirmRequest, PurgeSubmittedResponse, PurgeUrlRequest};

use crate::args::PurgeCmd;
use crate::client::{CliError, Ctx};
use crate::io::{confirm, to_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PurgeCmd) -> Result<(), CliError> {
    match cmd {
        PurgeCmd::Url { url } => purge_url(ctx, url).await,
        PurgeCmd::All { yes } => purge_all(ctx, yes).await,
    }
}

async fn purge_url(ctx: &Ctx, url: String) -> Result<(), CliError> {
    let payload = to_value(PurgeUrlRequest { url })?;
    let res: PurgeSubmittedResponse = ctx
        .request(Method::POST, "admin/purge/url", None, Some(payload))
        .await?;
    print_json(&res)
}

async fn purge_all(ctx: &Ctx, yes: bool) -> Result<(), CliError> {
    if !yes && !confirm("Submit a site-wide purge (purge_all, invalidate)?")? {
        println!("aborted");
        return Ok(());
    }

    let payload = to_value(ConfirmRequest { confirm: true })?;
    let res: PurgeSubmittedResponse = ctx
        .request(Method::POST, "admin/purge/all", None, Some(payload))
        .await?;
    print_json(&res)
}
