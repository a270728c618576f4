use std::path::Path;

use abr_native::{
	ClientConfig, MalformedPolicy, ServerConfig,
	abr_lite::{ChunkId, Error, NoopLog, State},
};
use tokio::sync::mpsc;

const MPD: &str = r#"<?xml version="1.0"?>
<MPD mediaPresentationDuration="PT10S" maxSegmentDuration="PT2S">
	<Period>
		<AdaptationSet mimeType="video/mp4">
			<Representation id="0" bandwidth="500000"/>
			<Representation id="1" bandwidth="1000000"/>
			<Representation id="2" bandwidth="2000000"/>
		</AdaptationSet>
	</Period>
</MPD>"#;

fn write_video(root: &Path, bitrates: &[u64]) {
	let chunks = root.join("bbb").join("chunks");
	std::fs::create_dir_all(&chunks).unwrap();
	std::fs::write(root.join("bbb").join("manifest.mpd"), MPD).unwrap();

	for &bitrate in bitrates {
		for index in 0..5 {
			let id = ChunkId::new("bbb", bitrate, index);
			std::fs::write(chunks.join(id.file_name()), vec![index as u8; 4096]).unwrap();
		}
	}
}

async fn start(root: &Path) -> anyhow::Result<String> {
	let server = ServerConfig {
		bind: "127.0.0.1:0".parse()?,
		dir: root.to_path_buf(),
		malformed: MalformedPolicy::Reject,
	}
	.init()
	.await?;

	let addr = server.local_addr()?;
	tokio::spawn(server.run());

	Ok(addr.to_string())
}

#[tokio::test]
async fn stream_full_video_over_tcp() -> anyhow::Result<()> {
	let dir = tempfile::tempdir()?;
	write_video(dir.path(), &[500000, 1000000, 2000000]);
	let addr = start(dir.path()).await?;

	let client = ClientConfig {
		server: addr,
		alpha: 0.5,
		read_timeout: Some(std::time::Duration::from_secs(10)),
	}
	.init()?;

	let (tx, mut rx) = mpsc::unbounded_channel();
	let mut session = client.connect("bbb").await?;
	let count = session.run(&tx, &NoopLog).await?;
	drop(tx);

	assert_eq!(count, 5);
	assert_eq!(session.state(), State::Done);

	let mut expected = 0;
	while let Some(chunk) = rx.recv().await {
		assert_eq!(chunk.id.index, expected);
		assert_eq!(chunk.payload.len(), 4096);
		if expected == 0 {
			assert_eq!(chunk.id.bitrate, 500000);
		}
		expected += 1;
	}
	assert_eq!(expected, 5);

	Ok(())
}

#[tokio::test]
async fn sessions_are_independent() -> anyhow::Result<()> {
	let dir = tempfile::tempdir()?;
	write_video(dir.path(), &[500000, 1000000, 2000000]);
	let addr = start(dir.path()).await?;

	let client = ClientConfig {
		server: addr,
		..Default::default()
	}
	.init()?;

	// A failing session must not disturb the next one.
	let (tx, _rx) = mpsc::unbounded_channel();
	let mut missing = client.connect("missing").await?;
	assert!(matches!(missing.run(&tx, &NoopLog).await, Err(Error::NotFound)));
	assert_eq!(missing.state(), State::Errored);

	let (tx, _rx) = mpsc::unbounded_channel();
	let mut session = client.connect("bbb").await?;
	assert_eq!(session.run(&tx, &NoopLog).await?, 5);

	Ok(())
}
