//! End-to-end wizard sessions driven by scripted prompts and canned tool output.

use std::path::PathBuf;

use tibuild_sdk::testing::{FakeRunner, RecordingExecutor, ScriptedPrompter};
use tibuild_sdk::tools::Captured;
use tibuild_sdk::wizard::MOST_RECENT;
use tibuild_sdk::{CommandLine, DispatchKind, Outcome, Wizard, WizardConfig, WizardError};

const IOS_INFO: &str = r#"{
    "iosCerts": {
        "devNames": ["Jane Doe (DEV1)"],
        "distNames": ["Acme Inc (DIST1)", "Acme Inc (DIST2)"],
        "wwdr": true
    },
    "iOSProvisioningProfiles": {
        "development": [{ "name": "Dev Wildcard", "uuid": "DEV-UUID" }],
        "distribution": [{ "name": "Store", "uuid": "STORE-UUID" }],
        "adhoc": [{ "name": "Testers", "uuid": "ADHOC-UUID" }],
        "enterprise": [{ "name": "In House", "uuid": "ENT-UUID" }]
    }
}"#;

fn config() -> WizardConfig {
    WizardConfig {
        titanium_cli: PathBuf::from("titanium"),
        android_sdk: PathBuf::from("/sdk"),
        ..WizardConfig::default()
    }
}

fn runner() -> FakeRunner {
    FakeRunner::new()
        .respond("project sdk-version", Captured::ok("3.2.3.GA\n"))
        .respond("list avd", Captured::ok("Nexus_5\nNexus_7\n"))
        .respond("info --types ios", Captured::ok(IOS_INFO))
}

fn build_prefix(platform: &str) -> Vec<String> {
    [
        "titanium",
        "build",
        "--sdk",
        "3.2.3.GA",
        "--project-dir",
        "/proj",
        "--no-colors",
        "--platform",
        platform,
        "--log-level",
        "info",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn with_tail(platform: &str, tail: &[&str]) -> CommandLine {
    let mut argv = build_prefix(platform);
    argv.extend(tail.iter().map(|s| s.to_string()));
    CommandLine::new(argv)
}

fn run(
    wizard: &mut Wizard,
    folders: &[&str],
    answers: &[Option<&str>],
) -> (Result<Outcome, WizardError>, ScriptedPrompter, RecordingExecutor) {
    let mut prompter = ScriptedPrompter::new(answers.iter().copied());
    let mut executor = RecordingExecutor::default();
    let folders = folders.iter().map(PathBuf::from).collect();
    let outcome = wizard.run_session(folders, &mut prompter, &mut executor);
    (outcome, prompter, executor)
}

fn dispatched(outcome: Result<Outcome, WizardError>) -> (DispatchKind, CommandLine) {
    match outcome.expect("session should succeed") {
        Outcome::Dispatched(dispatch) => (dispatch.kind, dispatch.command),
        Outcome::Aborted => panic!("session aborted unexpectedly"),
    }
}

#[test]
fn mobileweb_production_single_folder() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, prompter, executor) =
        run(&mut wizard, &["/proj"], &[Some("mobileweb"), Some("production")]);

    let (kind, command) = dispatched(outcome);
    let expected = with_tail("mobileweb", &["--deploy-type", "production"]);
    assert_eq!(kind, DispatchKind::Build);
    assert_eq!(command, expected);
    assert_eq!(executor.executed, vec![expected.clone()]);
    assert_eq!(wizard.most_recent(), Some(&expected));
    assert_eq!(prompter.shown()[0].prompt, "Platform");
    assert!(prompter.is_exhausted());
}

#[test]
fn clean_never_updates_most_recent() {
    let previous = with_tail("android", &["--target", "device"]);
    let mut wizard = Wizard::new(config(), runner()).with_most_recent(previous.clone());
    let (outcome, _, executor) = run(&mut wizard, &["/proj"], &[Some("clean")]);

    let (kind, command) = dispatched(outcome);
    assert_eq!(kind, DispatchKind::Clean);
    assert_eq!(
        command.argv(),
        ["titanium", "clean", "--no-colors", "--project-dir", "/proj"]
    );
    assert_eq!(executor.executed.len(), 1);
    assert_eq!(wizard.most_recent(), Some(&previous));
}

#[test]
fn android_emulator_lists_avds() {
    let fake = runner();
    let mut wizard = Wizard::new(config(), fake.clone());
    let (outcome, prompter, _) = run(
        &mut wizard,
        &["/proj"],
        &[Some("android"), Some("emulator"), Some("Nexus_7")],
    );

    let (_, command) = dispatched(outcome);
    assert_eq!(command, with_tail("android", &["--avd-id", "Nexus_7"]));
    assert_eq!(prompter.shown()[2].options, vec!["Nexus_5", "Nexus_7"]);
    assert!(
        fake.calls()
            .iter()
            .any(|c| c == &["/sdk/tools/android", "list", "avd", "-c"])
    );
}

#[test]
fn android_device_target() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, _, _) = run(&mut wizard, &["/proj"], &[Some("android"), Some("dist-playstore")]);
    let (_, command) = dispatched(outcome);
    assert_eq!(command, with_tail("android", &["--target", "dist-playstore"]));
}

#[test]
fn ios_simulator_retina_tall() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, _, _) = run(
        &mut wizard,
        &["/proj"],
        &[Some("ios"), Some("simulator"), Some("retina-tall")],
    );
    let (_, command) = dispatched(outcome);
    assert_eq!(
        command,
        with_tail("ios", &["--sim-type", "iphone", "--retina", "--tall"])
    );
}

#[test]
fn ios_simulator_non_retina_keeps_empty_slots() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, _, _) = run(
        &mut wizard,
        &["/proj"],
        &[Some("ios"), Some("simulator"), Some("non-retina")],
    );
    let (_, command) = dispatched(outcome);
    assert_eq!(command, with_tail("ios", &["--sim-type", "iphone", "", ""]));
    assert!(command.to_string().ends_with("--sim-type iphone"));
}

#[test]
fn ios_device_offers_development_identities_only() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, prompter, _) = run(
        &mut wizard,
        &["/proj"],
        &[
            Some("ios"),
            Some("device"),
            Some("universal"),
            Some("Jane Doe (DEV1)"),
            Some("Dev Wildcard (DEV-UUID)"),
        ],
    );

    let shown = prompter.shown();
    assert_eq!(shown[3].options, vec!["Jane Doe (DEV1)"]);
    assert_eq!(shown[4].options, vec!["Dev Wildcard (DEV-UUID)"]);

    let (_, command) = dispatched(outcome);
    assert_eq!(
        command,
        with_tail(
            "ios",
            &[
                "--target",
                "device",
                "--pp-uuid",
                "DEV-UUID",
                "--device-family",
                "universal",
                "--developer-name",
                "Jane Doe (DEV1)",
            ]
        )
    );
}

#[test]
fn ios_appstore_offers_distribution_identities() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, prompter, _) = run(
        &mut wizard,
        &["/proj"],
        &[
            Some("ios"),
            Some("dist-appstore"),
            Some("iphone"),
            Some("Acme Inc (DIST2)"),
            Some("Store (STORE-UUID)"),
        ],
    );

    assert_eq!(
        prompter.shown()[3].options,
        vec!["Acme Inc (DIST1)", "Acme Inc (DIST2)"]
    );
    assert_eq!(prompter.shown()[4].options, vec!["Store (STORE-UUID)"]);

    let (_, command) = dispatched(outcome);
    assert_eq!(
        &command.argv()[11..],
        [
            "--target",
            "dist-appstore",
            "--pp-uuid",
            "STORE-UUID",
            "--device-family",
            "iphone",
            "--distribution-name",
            "Acme Inc (DIST2)",
        ]
    );
}

#[test]
fn ios_adhoc_writes_to_dist_folder() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, prompter, _) = run(
        &mut wizard,
        &["/proj"],
        &[
            Some("ios"),
            Some("dist-adhoc"),
            Some("ipad"),
            Some("Acme Inc (DIST1)"),
            Some("Testers (ADHOC-UUID)"),
        ],
    );

    assert_eq!(prompter.shown()[4].options, vec!["Testers (ADHOC-UUID)"]);
    let (_, command) = dispatched(outcome);
    assert_eq!(
        &command.argv()[command.argv().len() - 4..],
        ["--distribution-name", "Acme Inc (DIST1)", "--output-dir", "/proj/dist"]
    );
}

#[test]
fn ios_version_override_applies() {
    let mut wizard = Wizard::new(config().ios_version("7.1"), runner());
    let (outcome, _, _) = run(&mut wizard, &["/proj"], &[Some("mobileweb"), Some("development")]);
    let (_, command) = dispatched(outcome);
    assert_eq!(
        &command.argv()[11..],
        ["--ios-version", "7.1", "--deploy-type", "development"]
    );
}

#[test]
fn cancel_at_any_step_dispatches_nothing() {
    let scripts: &[&[Option<&str>]] = &[
        &[None],
        &[Some("android"), None],
        &[Some("android"), Some("emulator"), None],
        &[Some("ios"), None],
        &[Some("ios"), Some("simulator"), None],
        &[Some("ios"), Some("device"), None],
        &[Some("ios"), Some("device"), Some("iphone"), None],
        &[Some("ios"), Some("device"), Some("iphone"), Some("Jane Doe (DEV1)"), None],
        &[Some("mobileweb"), None],
    ];

    for script in scripts {
        let previous = with_tail("android", &["--target", "device"]);
        let mut wizard = Wizard::new(config(), runner()).with_most_recent(previous.clone());
        let (outcome, _, executor) = run(&mut wizard, &["/proj"], script);
        assert_eq!(outcome.unwrap(), Outcome::Aborted, "script {script:?}");
        assert!(executor.executed.is_empty(), "script {script:?}");
        assert_eq!(wizard.most_recent(), Some(&previous), "script {script:?}");
    }
}

#[test]
fn most_recent_replays_across_sessions() {
    let mut wizard = Wizard::new(config(), runner());

    let (first, _, _) = run(&mut wizard, &["/proj"], &[Some("android"), Some("device")]);
    let (_, built) = dispatched(first);

    let (second, prompter, executor) = run(&mut wizard, &["/proj"], &[Some(MOST_RECENT)]);
    let (kind, replayed) = dispatched(second);
    assert_eq!(kind, DispatchKind::Replay);
    assert_eq!(replayed, built);
    assert_eq!(executor.executed, vec![built.clone()]);
    assert_eq!(prompter.shown()[0].options[0], MOST_RECENT);
    assert_eq!(wizard.most_recent(), Some(&built));
}

#[test]
fn most_recent_offered_once_with_multiple_folders() {
    let previous = with_tail("android", &["--target", "device"]);
    let mut wizard = Wizard::new(config(), runner()).with_most_recent(previous);
    let (outcome, prompter, _) = run(
        &mut wizard,
        &["/work/first", "/proj"],
        &[Some("proj"), Some("mobileweb"), Some("development")],
    );

    let shown = prompter.shown();
    assert_eq!(shown[0].options, vec![MOST_RECENT, "first", "proj"]);
    assert!(!shown[1].options.iter().any(|o| o == MOST_RECENT));

    let (_, command) = dispatched(outcome);
    assert_eq!(command, with_tail("mobileweb", &["--deploy-type", "development"]));
}

#[test]
fn sdk_detection_failure_surfaces_and_keeps_cache() {
    let previous = with_tail("android", &["--target", "device"]);
    let failing = FakeRunner::new().respond(
        "project sdk-version",
        Captured {
            code: Some(1),
            stdout: String::new(),
            stderr: "[ERROR] Invalid project directory".into(),
        },
    );
    let mut wizard = Wizard::new(config(), failing).with_most_recent(previous.clone());
    let (outcome, _, executor) = run(&mut wizard, &["/proj"], &[Some("mobileweb"), Some("production")]);

    assert!(matches!(outcome, Err(WizardError::ToolFailed { .. })));
    assert!(executor.executed.is_empty());
    assert_eq!(wizard.most_recent(), Some(&previous));
}

#[test]
fn garbled_ios_info_is_parse_error() {
    let garbled = FakeRunner::new().respond("info --types ios", Captured::ok("not json"));

    let mut wizard = Wizard::new(config(), garbled);
    let (outcome, _, _) = run(
        &mut wizard,
        &["/proj"],
        &[Some("ios"), Some("device"), Some("iphone")],
    );
    assert!(matches!(outcome, Err(WizardError::Parse(_))));
    assert!(wizard.most_recent().is_none());
}

#[test]
fn no_folders_is_no_project() {
    let mut wizard = Wizard::new(config(), runner());
    let (outcome, prompter, _) = run(&mut wizard, &[], &[]);
    assert!(matches!(outcome, Err(WizardError::NoProject)));
    assert!(prompter.shown().is_empty());
}
