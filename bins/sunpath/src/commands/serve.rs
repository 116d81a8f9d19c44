//! `serve`: the passthrough proxy

use crate::context::Context;
use anyhow::Result;
use std::net::SocketAddr;
use sunpath_core::Error;
use sunpath_proxy::ProxySettings;

pub async fn run(ctx: &Context, bind: Option<&str>, backend: Option<&str>) -> Result<()> {
    let mut settings = ProxySettings::from_config(&ctx.config)?.with_locale(ctx.locale);

    if let Some(bind) = bind {
        let addr: SocketAddr = bind
            .parse()
            .map_err(|_| Error::invalid_format("bind", bind, "HOST:PORT"))?;
        settings = settings.with_bind(addr);
    }
    if let Some(backend) = backend {
        settings = settings.with_backend(backend);
    }

    sunpath_proxy::serve(settings).await?;
    Ok(())
}
