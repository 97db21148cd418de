//! Scenario-driven QA runner for the host integration layer.
//!
//! Drives the adapter, control, and normalizer against a mock element the
//! way the example application drives the real one, one named scenario at a
//! time: `playground_qa_runner --scenario mount_flow` (or `all`).

mod mock;
mod settings;

use std::env;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use snafu::{OptionExt, ResultExt, Snafu, ensure};

use chatkit_host::{
    ElementAdapter, ElementEvent, LogEvent, ManualDefinitionNotifier, OptionsNormalizer,
    UserMessage,
};
use chatkit_options::{AsyncCallback, ClientToolCall, ColorScheme, JsonMap, Theme};

use mock::{MockElement, RecordedCall};
use settings::{PlaygroundSettings, SettingsStore};

#[derive(Debug, Clone)]
struct RunnerArgs {
    scenario: Scenario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    MountFlow,
    DeferredDefinition,
    UnmountCancelsDeferred,
    HandlerRebind,
    UnmountedWarning,
    ClientToolRoundtrip,
    SettingsRoundtrip,
    All,
}

impl Scenario {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "mount_flow" => Some(Self::MountFlow),
            "deferred_definition" => Some(Self::DeferredDefinition),
            "unmount_cancels_deferred" => Some(Self::UnmountCancelsDeferred),
            "handler_rebind" => Some(Self::HandlerRebind),
            "unmounted_warning" => Some(Self::UnmountedWarning),
            "client_tool_roundtrip" => Some(Self::ClientToolRoundtrip),
            "settings_roundtrip" => Some(Self::SettingsRoundtrip),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::MountFlow => "mount_flow",
            Self::DeferredDefinition => "deferred_definition",
            Self::UnmountCancelsDeferred => "unmount_cancels_deferred",
            Self::HandlerRebind => "handler_rebind",
            Self::UnmountedWarning => "unmounted_warning",
            Self::ClientToolRoundtrip => "client_tool_roundtrip",
            Self::SettingsRoundtrip => "settings_roundtrip",
            Self::All => "all",
        }
    }

    const ALL: [Scenario; 7] = [
        Self::MountFlow,
        Self::DeferredDefinition,
        Self::UnmountCancelsDeferred,
        Self::HandlerRebind,
        Self::UnmountedWarning,
        Self::ClientToolRoundtrip,
        Self::SettingsRoundtrip,
    ];
}

#[derive(Debug, Snafu)]
enum RunnerError {
    #[snafu(display("missing required --scenario argument"))]
    MissingScenario { stage: &'static str },
    #[snafu(display("missing value for argument '{arg}'"))]
    MissingArgumentValue {
        stage: &'static str,
        arg: &'static str,
    },
    #[snafu(display("unknown scenario '{raw}'"))]
    UnknownScenario { stage: &'static str, raw: String },
    #[snafu(display("unknown argument '{raw}'"))]
    UnknownArgument { stage: &'static str, raw: String },
    #[snafu(display("scenario '{scenario}' failed: {reason}"))]
    ScenarioFailed {
        stage: &'static str,
        scenario: &'static str,
        reason: String,
    },
    #[snafu(display("adapter rejected bind: {source}"))]
    Bind {
        stage: &'static str,
        source: chatkit_host::AdapterError,
    },
}

fn parse_args(raw_args: &[String]) -> Result<RunnerArgs, RunnerError> {
    let mut scenario = None;
    let mut index = 0;

    while index < raw_args.len() {
        match raw_args[index].as_str() {
            "--scenario" => {
                let value = raw_args.get(index + 1).context(MissingArgumentValueSnafu {
                    stage: "parse-args",
                    arg: "--scenario",
                })?;
                scenario = Some(Scenario::parse(value).context(UnknownScenarioSnafu {
                    stage: "parse-args",
                    raw: value.clone(),
                })?);
                index += 2;
            }
            other => {
                return UnknownArgumentSnafu {
                    stage: "parse-args",
                    raw: other.to_string(),
                }
                .fail();
            }
        }
    }

    Ok(RunnerArgs {
        scenario: scenario.context(MissingScenarioSnafu { stage: "parse-args" })?,
    })
}

fn mounted_adapter() -> Result<(ElementAdapter, Arc<MockElement>), RunnerError> {
    let notifier = Arc::new(ManualDefinitionNotifier::defined());
    let mut adapter = ElementAdapter::new(notifier);
    let element = Arc::new(MockElement::new());
    adapter
        .bind(element.clone())
        .context(BindSnafu { stage: "bind-mock" })?;
    Ok((adapter, element))
}

fn run_mount_flow() -> Result<(), RunnerError> {
    let scenario = Scenario::MountFlow.name();
    let (mut adapter, element) = mounted_adapter()?;
    let control = adapter.control();

    let ready_count = Arc::new(AtomicU32::new(0));
    let ready = ready_count.clone();
    let options = Arc::new(
        PlaygroundSettings::default()
            .to_host_options()
            .on_ready(move || {
                ready.fetch_add(1, Ordering::SeqCst);
            }),
    );

    let mut normalizer = OptionsNormalizer::new();
    adapter.commit(&normalizer.normalize(&options));
    // A second commit of the same record must not re-push.
    adapter.commit(&normalizer.normalize(&options));

    ensure!(
        element.push_count() == 1,
        ScenarioFailedSnafu {
            stage: "verify-push-count",
            scenario,
            reason: format!("expected 1 options push, saw {}", element.push_count()),
        }
    );

    let pushed = element.options().context(ScenarioFailedSnafu {
        stage: "read-pushed-options",
        scenario,
        reason: "no options were pushed".to_string(),
    })?;
    ensure!(
        matches!(pushed.theme, Some(Theme::Scheme(ColorScheme::Light))),
        ScenarioFailedSnafu {
            stage: "verify-theme",
            scenario,
            reason: "pushed options are missing the configured theme".to_string(),
        }
    );

    element.emit(ElementEvent::Ready);
    ensure!(
        ready_count.load(Ordering::SeqCst) == 1,
        ScenarioFailedSnafu {
            stage: "verify-ready-handler",
            scenario,
            reason: "onReady handler did not observe the ready event".to_string(),
        }
    );

    control.send_user_message(UserMessage::new("Hello! What can you do?"));
    control.focus_composer();
    let calls = element.calls();
    ensure!(
        calls.contains(&RecordedCall::SendUserMessage(
            "Hello! What can you do?".to_string()
        )) && calls.contains(&RecordedCall::FocusComposer),
        ScenarioFailedSnafu {
            stage: "verify-imperative-calls",
            scenario,
            reason: format!("imperative calls did not reach the element: {calls:?}"),
        }
    );

    adapter.unbind();
    ensure!(
        element.listener_count() == 0,
        ScenarioFailedSnafu {
            stage: "verify-unbind",
            scenario,
            reason: "unbind leaked listeners".to_string(),
        }
    );

    Ok(())
}

fn run_deferred_definition() -> Result<(), RunnerError> {
    let scenario = Scenario::DeferredDefinition.name();
    let notifier = Arc::new(ManualDefinitionNotifier::new());
    let mut adapter = ElementAdapter::new(notifier.clone());
    let element = Arc::new(MockElement::new());
    adapter
        .bind(element.clone())
        .context(BindSnafu { stage: "bind-mock" })?;

    let mut normalizer = OptionsNormalizer::new();
    let first = Arc::new(PlaygroundSettings::default().to_host_options());
    adapter.commit(&normalizer.normalize(&first));

    ensure!(
        element.push_count() == 0,
        ScenarioFailedSnafu {
            stage: "verify-no-early-push",
            scenario,
            reason: "configuration was pushed before the definition landed".to_string(),
        }
    );

    // A second commit before the definition lands supersedes the first.
    let second = Arc::new(
        PlaygroundSettings {
            greeting: "Updated greeting".to_string(),
            ..PlaygroundSettings::default()
        }
        .to_host_options(),
    );
    let normalized_second = normalizer.normalize(&second);
    adapter.commit(&normalized_second);

    notifier.define();

    ensure!(
        element.push_count() == 1,
        ScenarioFailedSnafu {
            stage: "verify-single-push",
            scenario,
            reason: format!("expected 1 deferred push, saw {}", element.push_count()),
        }
    );
    let pushed = element.options().context(ScenarioFailedSnafu {
        stage: "read-deferred-options",
        scenario,
        reason: "no options were applied after the definition landed".to_string(),
    })?;
    ensure!(
        Arc::ptr_eq(&pushed, &normalized_second.config),
        ScenarioFailedSnafu {
            stage: "verify-last-write-wins",
            scenario,
            reason: "a stale configuration was applied".to_string(),
        }
    );

    Ok(())
}

fn run_unmount_cancels_deferred() -> Result<(), RunnerError> {
    let scenario = Scenario::UnmountCancelsDeferred.name();
    let notifier = Arc::new(ManualDefinitionNotifier::new());
    let mut adapter = ElementAdapter::new(notifier.clone());
    let element = Arc::new(MockElement::new());
    adapter
        .bind(element.clone())
        .context(BindSnafu { stage: "bind-mock" })?;

    let mut normalizer = OptionsNormalizer::new();
    let options = Arc::new(PlaygroundSettings::default().to_host_options());
    adapter.commit(&normalizer.normalize(&options));

    adapter.unbind();
    notifier.define();

    ensure!(
        element.push_count() == 0,
        ScenarioFailedSnafu {
            stage: "verify-cancelled-push",
            scenario,
            reason: "deferred push applied after unmount".to_string(),
        }
    );

    Ok(())
}

fn run_handler_rebind() -> Result<(), RunnerError> {
    let scenario = Scenario::HandlerRebind.name();
    let (mut adapter, element) = mounted_adapter()?;
    let mut normalizer = OptionsNormalizer::new();

    let first_seen = Arc::new(Mutex::new(Vec::new()));
    let sink = first_seen.clone();
    let first = Arc::new(
        PlaygroundSettings::default()
            .to_host_options()
            .on_log(move |log: LogEvent| sink.lock().unwrap().push(log.name)),
    );
    adapter.commit(&normalizer.normalize(&first));

    let second_seen = Arc::new(Mutex::new(Vec::new()));
    let sink = second_seen.clone();
    let second = Arc::new(
        PlaygroundSettings::default()
            .to_host_options()
            .on_log(move |log: LogEvent| sink.lock().unwrap().push(log.name)),
    );
    adapter.commit(&normalizer.normalize(&second));

    ensure!(
        element.listener_count() == chatkit_host::EVENT_KINDS.len(),
        ScenarioFailedSnafu {
            stage: "verify-listener-count",
            scenario,
            reason: format!(
                "rebind accumulated listeners: {}",
                element.listener_count()
            ),
        }
    );

    element.emit(ElementEvent::Log(LogEvent {
        name: "history.open".to_string(),
        data: None,
    }));

    ensure!(
        first_seen.lock().unwrap().is_empty(),
        ScenarioFailedSnafu {
            stage: "verify-old-handler-silent",
            scenario,
            reason: "a replaced handler observed an event".to_string(),
        }
    );
    ensure!(
        second_seen.lock().unwrap().as_slice() == ["history.open"],
        ScenarioFailedSnafu {
            stage: "verify-new-handler",
            scenario,
            reason: "the current handler did not observe the event".to_string(),
        }
    );

    Ok(())
}

fn run_unmounted_warning() -> Result<(), RunnerError> {
    let scenario = Scenario::UnmountedWarning.name();
    let notifier = Arc::new(ManualDefinitionNotifier::defined());
    let adapter = ElementAdapter::new(notifier);
    let control = adapter.control();

    // Every imperative call must degrade to a logged warning, not a panic.
    control.send_user_message(UserMessage::new("hello before mount"));
    control.focus_composer();
    control.fetch_updates();
    control.set_thread_id(None);

    ensure!(
        !control.is_mounted(),
        ScenarioFailedSnafu {
            stage: "verify-unmounted",
            scenario,
            reason: "control reports a mounted element with none bound".to_string(),
        }
    );

    Ok(())
}

async fn run_client_tool_roundtrip() -> Result<(), RunnerError> {
    let scenario = Scenario::ClientToolRoundtrip.name();
    let (mut adapter, element) = mounted_adapter()?;

    let options = Arc::new(
        PlaygroundSettings::default()
            .to_host_options()
            .on_client_tool(AsyncCallback::new(|call: ClientToolCall| async move {
                let mut result = JsonMap::new();
                result.insert("tool".to_string(), serde_json::Value::String(call.name));
                result.insert(
                    "param_count".to_string(),
                    serde_json::Value::from(call.params.len()),
                );
                result
            })),
    );
    adapter.commit(&OptionsNormalizer::new().normalize(&options));

    // The element consumes the handler inline from its options; simulate
    // the backend asking it to run a client tool.
    let pushed = element.options().context(ScenarioFailedSnafu {
        stage: "read-pushed-options",
        scenario,
        reason: "no options were pushed".to_string(),
    })?;
    let handler = pushed
        .on_client_tool
        .as_ref()
        .context(ScenarioFailedSnafu {
            stage: "read-client-tool-handler",
            scenario,
            reason: "client tool handler missing from configuration".to_string(),
        })?;

    let mut params = JsonMap::new();
    params.insert("query".to_string(), serde_json::Value::String("docs".into()));
    let result = handler
        .invoke(ClientToolCall {
            name: "search_docs".to_string(),
            params,
        })
        .await;

    ensure!(
        result.get("tool").and_then(|value| value.as_str()) == Some("search_docs")
            && result.get("param_count").and_then(|value| value.as_u64()) == Some(1),
        ScenarioFailedSnafu {
            stage: "verify-tool-result",
            scenario,
            reason: format!("unexpected tool result: {result:?}"),
        }
    );

    Ok(())
}

fn run_settings_roundtrip() -> Result<(), RunnerError> {
    let scenario = Scenario::SettingsRoundtrip.name();
    let dir = std::env::temp_dir().join(format!(
        "chatkit-playground-{}",
        uuid::Uuid::now_v7().as_simple()
    ));
    let path = dir.join(settings::SETTINGS_FILE_NAME);

    let mut store = SettingsStore::new(path.clone());
    let updated = PlaygroundSettings {
        greeting: "Bonjour".to_string(),
        locale: "fr".to_string(),
        ..PlaygroundSettings::default()
    };
    store
        .update(updated)
        .map_err(|error| RunnerError::ScenarioFailed {
            stage: "persist-settings",
            scenario,
            reason: error.to_string(),
        })?;

    let reloaded = SettingsStore::new(path);
    let resolved = reloaded
        .settings()
        .resolved_locale()
        .map(|locale| locale.resolve_translated());
    ensure!(
        reloaded.settings().greeting == "Bonjour" && resolved == Some("fr-FR"),
        ScenarioFailedSnafu {
            stage: "verify-reload",
            scenario,
            reason: format!("unexpected reloaded settings: {:?}", reloaded.settings()),
        }
    );

    let _ = std::fs::remove_dir_all(dir);
    Ok(())
}

async fn run_scenario(scenario: Scenario) -> Result<(), RunnerError> {
    match scenario {
        Scenario::MountFlow => run_mount_flow(),
        Scenario::DeferredDefinition => run_deferred_definition(),
        Scenario::UnmountCancelsDeferred => run_unmount_cancels_deferred(),
        Scenario::HandlerRebind => run_handler_rebind(),
        Scenario::UnmountedWarning => run_unmounted_warning(),
        Scenario::ClientToolRoundtrip => run_client_tool_roundtrip().await,
        Scenario::SettingsRoundtrip => run_settings_roundtrip(),
        Scenario::All => {
            for scenario in Scenario::ALL {
                Box::pin(run_scenario(scenario)).await?;
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let raw_args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(error) => {
            eprintln!("{error}");
            eprintln!(
                "usage: playground_qa_runner --scenario <{}|all>",
                Scenario::ALL.map(|scenario| scenario.name()).join("|")
            );
            std::process::exit(2);
        }
    };

    match run_scenario(args.scenario).await {
        Ok(()) => {
            println!("scenario '{}' passed", args.scenario.name());
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}
