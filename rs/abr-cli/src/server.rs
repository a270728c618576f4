pub async fn server(config: abr_native::ServerConfig) -> anyhow::Result<()> {
	let server = config.init().await?;

	tokio::select! {
		res = server.run() => res,
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("shutting down");
			Ok(())
		},
	}
}
