use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tasklab::{
    Action, App, Config, DOWNLOAD_RESULT, Event, EventKind, Logger, MemorySink, ReceiveMode,
    Screen, Subscribe,
};
use tokio::time::Instant;

fn app_with(cfg: Config) -> (App, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let app = App::new(cfg, Logger::new(sink.clone())).expect("app starts");
    (app, sink)
}

fn small_pool() -> Config {
    Config {
        dispatch_threads: 1,
        ..Config::default()
    }
}

/// Messages logged by tasks, without the click bracket lines.
fn task_lines(sink: &MemorySink) -> Vec<String> {
    sink.messages()
        .into_iter()
        .filter(|m| !m.starts_with("onClick"))
        .collect()
}

fn position(lines: &[String], message: &str) -> usize {
    lines
        .iter()
        .position(|m| m == message)
        .unwrap_or_else(|| panic!("{message:?} not in {lines:?}"))
}

async fn wait_until<F>(sink: &MemorySink, done: F)
where
    F: Fn(&[String]) -> bool,
{
    tokio::time::timeout(Duration::from_secs(10), async {
        while !done(&sink.messages()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition reached in time");
}

#[tokio::test(start_paused = true)]
async fn press_brackets_handler_with_click_lines() {
    let (app, sink) = app_with(small_pool());
    let screen = Screen::create(&app);

    screen.press(Action::Flow);

    // Handlers only schedule work; nothing ran yet.
    assert_eq!(sink.messages(), vec!["onClick, start", "onClick, end"]);
    app.global().idle().await;
    assert_eq!(task_lines(&sink), vec!["20", "30", "40"]);
}

#[tokio::test(start_paused = true)]
async fn channel_receives_three_values_in_order() {
    let (app, sink) = app_with(small_pool());
    Screen::create(&app).press(Action::Channel);

    app.global().idle().await;
    assert_eq!(task_lines(&sink), vec!["1", "2", "3"]);
}

#[tokio::test(start_paused = true)]
async fn channel_until_closed_mode_drains_everything() {
    let (app, sink) = app_with(Config {
        receive_mode: ReceiveMode::UntilClosed,
        channel_capacity: 1,
        ..small_pool()
    });
    Screen::create(&app).press(Action::Channel);

    app.global().idle().await;
    assert_eq!(task_lines(&sink), vec!["1", "2", "3"]);
}

#[tokio::test(start_paused = true)]
async fn broadcast_delivers_every_value_to_both_subscriptions() {
    let (app, sink) = app_with(small_pool());
    let started = Instant::now();
    Screen::create(&app).press(Action::Broadcast);

    app.global().idle().await;
    assert!(started.elapsed() >= app.config().tick);

    let lines = task_lines(&sink);
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["1", "1", "2", "2", "3", "3", "4", "4"]);
    for pair in ["1", "2", "3", "4"].windows(2) {
        assert!(position(&lines, pair[0]) < position(&lines, pair[1]));
    }
}

#[tokio::test(start_paused = true)]
async fn produce_and_actor_see_one_through_four() {
    for action in [Action::Produce, Action::Actor] {
        let (app, sink) = app_with(small_pool());
        Screen::create(&app).press(action);

        app.global().idle().await;
        assert_eq!(task_lines(&sink), vec!["1", "2", "3", "4"], "{action}");
    }
}

#[tokio::test(start_paused = true)]
async fn flow_is_cold() {
    let (app, sink) = app_with(small_pool());
    let screen = Screen::create(&app);

    screen.press(Action::Flow);
    app.global().idle().await;
    screen.press(Action::Flow);
    app.global().idle().await;

    assert_eq!(task_lines(&sink), vec!["20", "30", "40", "20", "30", "40"]);
}

#[tokio::test(start_paused = true)]
async fn launch_waits_for_download() {
    let (app, sink) = app_with(small_pool());
    let started = Instant::now();
    Screen::create(&app).press(Action::Launch);

    app.global().idle().await;
    assert!(started.elapsed() >= app.config().download_delay);
    assert_eq!(
        task_lines(&sink),
        vec![
            "launchExample start on scope global",
            "download done",
            "launchExample end"
        ]
    );
    assert_eq!(DOWNLOAD_RESULT, 30);
}

#[tokio::test(start_paused = true)]
async fn scoped_launch_only_runs_the_unscoped_task() {
    let (app, sink) = app_with(small_pool());
    Screen::create(&app).press(Action::ScopedLaunch);

    app.global().idle().await;
    tokio::time::sleep(app.config().download_delay * 2).await;

    let lines = task_lines(&sink);
    assert!(lines.iter().all(|m| !m.starts_with("scopeLaunch custom")), "{lines:?}");
    assert_eq!(
        lines,
        vec![
            "scopeLaunch global start on scope global",
            "download done",
            "scopeLaunch global end"
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn deferred_result_reaches_the_awaiter() {
    let (app, sink) = app_with(small_pool());
    let started = Instant::now();
    Screen::create(&app).press(Action::Deferred);

    app.global().idle().await;
    assert!(started.elapsed() >= app.config().ticks(5));
    assert_eq!(
        task_lines(&sink),
        vec!["async start", "async end", "received async result"]
    );
}

#[tokio::test(start_paused = true)]
async fn launch_join_parent_does_not_wait_by_default() {
    let (app, sink) = app_with(small_pool());
    Screen::create(&app).press(Action::LaunchJoin);

    app.global().idle().await;
    assert_eq!(
        task_lines(&sink),
        vec!["launch join start", "launch join end", "download done"]
    );
}

#[tokio::test(start_paused = true)]
async fn launch_join_parent_waits_when_configured() {
    let (app, sink) = app_with(Config {
        join_child: true,
        ..small_pool()
    });
    Screen::create(&app).press(Action::LaunchJoin);

    app.global().idle().await;
    assert_eq!(
        task_lines(&sink),
        vec!["launch join start", "download done", "launch join end"]
    );
}

#[tokio::test(start_paused = true)]
async fn failure_is_logged_and_sibling_completes() {
    let (app, sink) = app_with(small_pool());
    let screen = Screen::create(&app);
    screen.press(Action::Failures);

    tokio::time::sleep(app.config().ticks(3)).await;

    let lines = task_lines(&sink);
    assert_eq!(lines.len(), 4, "{lines:?}");
    assert!(position(&lines, "first start") < position(&lines, "first finish"));
    assert!(position(&lines, "first finish") < position(&lines, "second failed"));
    assert!(!screen.main_scope().is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn destroy_stops_screen_tasks_but_not_global_ones() {
    let (app, sink) = app_with(small_pool());
    let screen = Screen::create(&app);
    screen.press(Action::Failures);
    screen.press(Action::Launch);

    tokio::time::sleep(app.config().tick / 2).await;
    assert!(sink.contains("first start"));
    screen.destroy().expect("screen scope can be torn down");

    app.global().idle().await;
    tokio::time::sleep(app.config().ticks(3)).await;

    assert!(!sink.contains("first finish"));
    assert!(!sink.contains("second failed"));
    assert!(sink.contains("launchExample end"));
    assert!(app.global().cancel().is_err());
}

#[tokio::test]
async fn dispatch_jobs_run_on_pool_threads() {
    let (app, sink) = app_with(Config {
        tick: Duration::from_millis(10),
        dispatch_jobs: 6,
        dispatch_threads: 2,
        ..Config::default()
    });
    Screen::create(&app).press(Action::DispatchPool);

    wait_until(&sink, |m| m.iter().filter(|l| l.starts_with("dispatcher ")).count() == 6).await;

    let mut indices: Vec<usize> = Vec::new();
    for ev in sink.events() {
        if let Some(i) = ev.message.strip_prefix("dispatcher ") {
            assert!(ev.thread.starts_with("dispatch-worker-"), "{}", ev.thread);
            indices.push(i.parse().expect("numeric index"));
        }
    }
    indices.sort_unstable();
    assert_eq!(indices, (0..6).collect::<Vec<_>>());
}

#[tokio::test]
async fn blocking_download_holds_a_pool_thread() {
    let (app, sink) = app_with(Config {
        download_delay: Duration::from_millis(30),
        dispatch_threads: 1,
        ..Config::default()
    });
    let started = std::time::Instant::now();
    Screen::create(&app).press(Action::BlockingDownload);

    wait_until(&sink, |m| m.iter().any(|l| l == "downloadWithBlock end 30")).await;
    assert!(started.elapsed() >= Duration::from_millis(30));

    let done = sink
        .events()
        .into_iter()
        .find(|e| e.message == "download done")
        .expect("download resolved");
    assert!(done.thread.starts_with("dispatch-worker-"), "{}", done.thread);
}

#[tokio::test]
async fn destroy_stops_blocking_download_mid_sleep() {
    let (app, sink) = app_with(Config {
        download_delay: Duration::from_millis(200),
        dispatch_threads: 1,
        ..Config::default()
    });
    let screen = Screen::create(&app);
    screen.press(Action::BlockingDownload);

    wait_until(&sink, |m| m.iter().any(|l| l == "downloadWithBlock start")).await;
    screen.destroy().expect("screen scope can be torn down");
    tokio::time::sleep(Duration::from_millis(500)).await;

    let lines = task_lines(&sink);
    assert!(!lines.iter().any(|l| l == "download done"), "{lines:?}");
    assert!(
        !lines.iter().any(|l| l.starts_with("downloadWithBlock end")),
        "{lines:?}"
    );
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(EventKind, Option<String>)>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.seen
            .lock()
            .unwrap()
            .push((event.kind, event.task.as_deref().map(str::to_string)));
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_failure_routing() {
    let recorder = Arc::new(Recorder::default());
    let (app, _sink) = app_with(small_pool());
    let app = app.with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>]);
    Screen::create(&app).press(Action::Failures);

    tokio::time::sleep(app.config().ticks(4)).await;

    let seen = recorder.seen.lock().unwrap().clone();
    let second = Some("second".to_string());
    assert!(seen.contains(&(EventKind::TaskFailed, second.clone())), "{seen:?}");
    assert!(seen.contains(&(EventKind::FailureHandled, second)), "{seen:?}");
    assert!(seen.contains(&(EventKind::TaskCompleted, Some("first".to_string()))));
}
