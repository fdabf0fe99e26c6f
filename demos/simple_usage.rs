use log_tail::{Config, follow};
use std::io::Write;
use std::time::Duration;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("app.log");
    std::fs::write(&path, "2023-01-01 10:00:00 INFO Starting application\n")?;

    let cancel = CancellationToken::new();
    let config = Config::new().with_start_from_beginning(true);
    let mut tailer = follow(&cancel, &path, config).await?;

    println!("Following {} ...", path.display());

    // A writer appending in the background, rotating halfway through.
    let writer_path = path.clone();
    let writer_cancel = cancel.clone();
    tokio::spawn(async move {
        for i in 1..=4 {
            tokio::time::sleep(Duration::from_millis(200)).await;
            if i == 3 {
                let _ = std::fs::rename(&writer_path, writer_path.with_extension("log.1"));
            }
            let appended = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&writer_path)
                .and_then(|mut file| writeln!(file, "2023-01-01 10:00:0{i} INFO Request {i} served"));
            if let Err(e) = appended {
                eprintln!("writer failed: {}", e);
            }
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
        writer_cancel.cancel();
    });

    let mut count = 0;
    while let Some(line) = tailer.next().await {
        count += 1;
        println!("[{}] {} {}", count, line.observed_at().format("%H:%M:%S%.3f"), line.text());
    }

    if let Some(e) = tailer.err() {
        eprintln!("Error: {}", e);
    }

    Ok(())
}
