use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tello::video::{FrameSink, PassthroughDecoder, VideoConfig, VideoFrame};
use tello::{Tello, TelloConfig};
use tracing::{info, warn};

use crate::cmd::{Context, RecordArgs};
use crate::exit::{client_error, io_error, video_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::print_report;

const WAIT_SLICE: Duration = Duration::from_millis(50);

#[derive(Serialize)]
struct RecordOutput {
    schema_id: &'static str,
    file: String,
    frames: u64,
    bytes: u64,
    seconds: f64,
    interrupted: bool,
}

/// Appends every encoded access unit to a file.
struct FileSink {
    writer: BufWriter<File>,
    stats: Arc<SinkStats>,
}

#[derive(Default)]
struct SinkStats {
    frames: AtomicU64,
    bytes: AtomicU64,
    failed: AtomicBool,
}

impl FileSink {
    fn create(path: &Path, stats: Arc<SinkStats>) -> CliResult<Self> {
        let file = File::create(path)
            .map_err(|err| io_error(&format!("cannot create {}", path.display()), err))?;
        Ok(Self {
            writer: BufWriter::new(file),
            stats,
        })
    }
}

impl FrameSink for FileSink {
    fn on_frame(&mut self, frame: &VideoFrame) {
        if self.stats.failed.load(Ordering::Relaxed) {
            return;
        }
        match self.writer.write_all(&frame.data) {
            Ok(()) => {
                self.stats.frames.fetch_add(1, Ordering::Relaxed);
                self.stats
                    .bytes
                    .fetch_add(frame.data.len() as u64, Ordering::Relaxed);
            }
            Err(err) => {
                warn!(error = %err, "recording write failed; dropping further frames");
                self.stats.failed.store(true, Ordering::Relaxed);
            }
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            warn!(error = %err, "recording flush failed");
            self.stats.failed.store(true, Ordering::Relaxed);
        }
    }
}

pub fn run(args: RecordArgs, ctx: &Context) -> CliResult<i32> {
    if args.seconds == 0 {
        return Err(CliError::new(USAGE, "--seconds must be greater than zero"));
    }

    let stats = Arc::new(SinkStats::default());
    let sink = FileSink::create(&args.file, Arc::clone(&stats))?;

    let config = TelloConfig {
        client: ctx.client.clone(),
        video: VideoConfig {
            bind_addr: args.video,
            ..VideoConfig::default()
        },
    };
    // The channel keeps its own token: Ctrl-C ends the recording, and
    // `streamoff` must still go out afterwards.
    let mut tello = Tello::new(config, || PassthroughDecoder).with_frame_sink(sink);

    tello
        .start()
        .map_err(|err| client_error("handshake failed", err))?;
    tello
        .start_video()
        .map_err(|err| video_error("video start failed", err))?;

    let started = Instant::now();
    let limit = Duration::from_secs(args.seconds);
    info!(file = %args.file.display(), ?limit, "recording");
    while started.elapsed() < limit && !ctx.interrupt.is_cancelled() {
        std::thread::sleep(WAIT_SLICE.min(limit.saturating_sub(started.elapsed())));
    }
    let interrupted = ctx.interrupt.is_cancelled();
    let elapsed = started.elapsed();

    let stopped = tello.stop_video();
    // Dropping the client releases the sink and flushes the file.
    drop(tello);
    stopped.map_err(|err| video_error("video stop failed", err))?;

    if stats.failed.load(Ordering::Relaxed) {
        return Err(CliError::new(
            crate::exit::INTERNAL,
            format!("recording to {} was incomplete", args.file.display()),
        ));
    }

    let out = RecordOutput {
        schema_id: "https://schemas.3leaps.dev/tello/cli/v1/record.schema.json",
        file: args.file.display().to_string(),
        frames: stats.frames.load(Ordering::Relaxed),
        bytes: stats.bytes.load(Ordering::Relaxed),
        seconds: (elapsed.as_secs_f64() * 100.0).round() / 100.0,
        interrupted,
    };
    print_report(
        &out,
        &[
            ("file", out.file.clone()),
            ("frames", out.frames.to_string()),
            ("bytes", out.bytes.to_string()),
            ("seconds", format!("{:.2}", out.seconds)),
        ],
        &out.frames.to_string(),
        ctx.format,
    );
    Ok(SUCCESS)
}
