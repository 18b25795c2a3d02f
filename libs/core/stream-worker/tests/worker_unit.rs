use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use core_config::redis::RedisConfig;
use lifecycle::{Unit, UnitError};
use serde::{Deserialize, Serialize};
use stream_worker::{
    DlqManager, StreamConsumer, StreamDef, StreamError, StreamJob, StreamProcessor,
    StreamProducer, StreamWorkerUnit, WorkerConfig,
};
use test_utils::TestRedis;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GreetJob {
    id: String,
    fail: bool,
    #[serde(default)]
    retry_count: u32,
}

impl StreamJob for GreetJob {
    fn job_id(&self) -> String {
        self.id.clone()
    }

    fn retry_count(&self) -> u32 {
        self.retry_count
    }

    fn with_retry(&self) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            ..self.clone()
        }
    }

    fn max_retries(&self) -> u32 {
        2
    }
}

struct GreetStream;

impl StreamDef for GreetStream {
    const STREAM_NAME: &'static str = "greet:jobs";
    const CONSUMER_GROUP: &'static str = "greet_workers";
    const DLQ_STREAM: &'static str = "greet:dlq";
}

#[derive(Default)]
struct CountingProcessor {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl StreamProcessor<GreetJob> for CountingProcessor {
    async fn process(&self, job: &GreetJob) -> Result<(), StreamError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if job.fail {
            return Err(StreamError::transient("greeting refused"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CountingProcessor"
    }
}

fn fast_config() -> WorkerConfig {
    WorkerConfig::from_stream_def::<GreetStream>().with_block_timeout(Duration::from_millis(100))
}

fn greet(id: &str) -> GreetJob {
    GreetJob {
        id: id.into(),
        fail: false,
        retry_count: 0,
    }
}

/// Minimal RESP2 server: `PONG` for PING, a nil reply once the BLOCK time
/// has passed for XREADGROUP, `OK` for everything else.
async fn idle_redis() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(answer_idle(stream));
        }
    });

    addr
}

async fn answer_idle(stream: TcpStream) {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    while let Some(args) = read_command(&mut reader).await {
        let reply: &[u8] = match args.first().map(|cmd| cmd.to_ascii_uppercase()).as_deref() {
            Some("PING") => b"+PONG\r\n",
            Some("XREADGROUP") => {
                let block_ms = args
                    .iter()
                    .position(|arg| arg.eq_ignore_ascii_case("BLOCK"))
                    .and_then(|i| args.get(i + 1))
                    .and_then(|ms| ms.parse().ok())
                    .unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(block_ms)).await;
                b"*-1\r\n"
            }
            _ => b"+OK\r\n",
        };
        if write.write_all(reply).await.is_err() {
            return;
        }
    }
}

async fn read_command<R>(reader: &mut R) -> Option<Vec<String>>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut arg = vec![0; len + 2];
        reader.read_exact(&mut arg).await.ok()?;
        arg.truncate(len);
        args.push(String::from_utf8(arg).ok()?);
    }
    Some(args)
}

async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("redis://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_idle_read_returns_no_jobs() {
    let addr = idle_redis().await;
    // Default block time, which is longer than the client's default reply timeout.
    let config = WorkerConfig::from_stream_def::<GreetStream>();
    let block = config.block_timeout;

    let conn = database::redis::connect_with_config(
        &format!("redis://{addr}"),
        config.connection_config(),
    )
    .await
    .unwrap();
    let consumer = StreamConsumer::new(conn, config);

    let started = Instant::now();
    let events = consumer.read_new::<GreetJob>().await.unwrap();

    assert!(events.is_empty());
    assert!(started.elapsed() >= block);
}

#[tokio::test]
async fn test_unreachable_redis_is_unit_fatal() {
    let unit = StreamWorkerUnit::new(
        &RedisConfig::new(closed_port_url().await),
        CountingProcessor::default(),
        fast_config(),
    );

    let err = tokio::time::timeout(Duration::from_secs(20), unit.serve())
        .await
        .expect("connect retries are bounded")
        .unwrap_err();
    assert!(matches!(err, UnitError::Connect { target: "redis", .. }));

    // stop after a failed serve returns at once
    tokio::time::timeout(Duration::from_millis(100), unit.stop())
        .await
        .expect("stop after failure should not block");
}

#[tokio::test]
async fn test_stop_before_serve_and_double_stop() {
    let unit = StreamWorkerUnit::new(
        &RedisConfig::new("redis://127.0.0.1:6379"),
        CountingProcessor::default(),
        fast_config(),
    );
    assert_eq!(unit.name(), "tasks");

    unit.stop().await;
    unit.stop().await;

    assert!(unit.serve().await.unwrap_err().is_closed());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_jobs_are_processed_retried_and_dead_lettered() {
    let redis = TestRedis::new().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let processor = CountingProcessor {
        attempts: Arc::clone(&attempts),
    };

    let unit = Arc::new(StreamWorkerUnit::new(
        &RedisConfig::new(redis.url.clone()),
        processor,
        fast_config(),
    ));
    let serving = {
        let unit = Arc::clone(&unit);
        tokio::spawn(async move { unit.serve().await })
    };

    let conn = database::redis::connect(&redis.url).await.unwrap();
    let producer = StreamProducer::from_stream_def::<GreetStream>(conn.clone());
    producer
        .send(&GreetJob {
            id: "ok".into(),
            fail: false,
            retry_count: 0,
        })
        .await
        .unwrap();
    producer
        .send(&GreetJob {
            id: "bad".into(),
            fail: true,
            retry_count: 0,
        })
        .await
        .unwrap();

    // one success plus the failing job's first attempt and two retries
    let dlq = DlqManager::new(conn, GreetStream::DLQ_STREAM);
    tokio::time::timeout(Duration::from_secs(10), async {
        while dlq.list(10).await.unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("failing job should reach the DLQ");

    let dead = dlq.list(10).await.unwrap();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].job_id, "bad");
    assert_eq!(dead[0].retry_count, 2);
    assert_eq!(attempts.load(Ordering::SeqCst), 4);

    unit.stop().await;
    let result = serving.await.unwrap();
    assert!(result.unwrap_err().is_closed());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_jobs_left_pending_by_a_gone_consumer_are_claimed() {
    let redis = TestRedis::new().await;
    let conn = database::redis::connect(&redis.url).await.unwrap();

    let producer = StreamProducer::from_stream_def::<GreetStream>(conn.clone());
    for id in ["a", "b", "c"] {
        producer.send(&greet(id)).await.unwrap();
    }

    // An earlier process read the batch and stopped before running it.
    let gone = StreamConsumer::new(conn, fast_config().with_consumer_id("worker-gone"));
    gone.ensure_consumer_group().await.unwrap();
    assert_eq!(gone.read_new::<GreetJob>().await.unwrap().len(), 3);
    assert_eq!(
        redis.pending_count(GreetStream::STREAM_NAME, GreetStream::CONSUMER_GROUP).await,
        3
    );

    let attempts = Arc::new(AtomicUsize::new(0));
    let processor = CountingProcessor {
        attempts: Arc::clone(&attempts),
    };
    let unit = Arc::new(StreamWorkerUnit::new(
        &RedisConfig::new(redis.url.clone()),
        processor,
        fast_config().with_claim_min_idle(Duration::from_millis(200)),
    ));
    let serving = {
        let unit = Arc::clone(&unit);
        tokio::spawn(async move { unit.serve().await })
    };

    tokio::time::timeout(Duration::from_secs(10), async {
        let (stream, group) = (GreetStream::STREAM_NAME, GreetStream::CONSUMER_GROUP);
        while redis.pending_count(stream, group).await > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("stranded jobs should be claimed and acknowledged");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    unit.stop().await;
    assert!(serving.await.unwrap().unwrap_err().is_closed());
}
