// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use listener_adapter::{
    adapter::{ListenerAdapterBuilder, LoadContext},
    config::AdapterConfig,
    errors::DispatchError,
    listener::{ListenerArg, ListenerMethod, TestListener},
    registry::RegistryStripes,
    test_unit::TestHandle,
};
use pretty_assertions::assert_eq;

fn outcomes(events: &[Event]) -> Vec<(String, Outcome)> {
    events
        .iter()
        .map(|event| (event.entry.name().to_owned(), event.outcome))
        .collect()
}

#[test]
fn start_end_reports_success() {
    let adapter = new_adapter();
    let t1 = TestHandle::new(CaseTest {
        suite: "parser",
        index: 1,
    });

    adapter.notify("startTest", &[t1.clone().into()]).unwrap();
    adapter.notify("endTest", &[t1.into()]).unwrap();

    let events = adapter.reporter().events();
    assert_eq!(
        outcomes(&events),
        vec![
            ("parser::case_1".to_owned(), Outcome::Starting),
            ("parser::case_1".to_owned(), Outcome::Succeeded),
        ],
    );
    assert!(
        events[1].entry.group().ends_with("fixtures::CaseTest"),
        "group is the type name: {}",
        events[1].entry.group(),
    );
}

#[test]
fn start_failure_end_reports_failure_only() {
    let adapter = new_adapter();
    let t1 = TestHandle::new(CaseTest {
        suite: "parser",
        index: 1,
    });

    adapter.notify("startTest", &[t1.clone().into()]).unwrap();
    adapter
        .notify(
            "addFailure",
            &[t1.clone().into(), cause("expected `}`").into()],
        )
        .unwrap();
    adapter.notify("endTest", &[t1.into()]).unwrap();

    let events = adapter.reporter().events();
    assert_eq!(
        outcomes(&events),
        vec![
            ("parser::case_1".to_owned(), Outcome::Starting),
            ("parser::case_1".to_owned(), Outcome::Failed),
        ],
    );
    assert_eq!(events[1].entry.group(), "expected `}`");
    assert_eq!(adapter.pending_failures(), 0);
}

#[test]
fn custom_type_name_is_group() {
    let adapter = new_adapter();
    let suite = TestHandle::new(SuiteTest("AllTests"));

    adapter.start_test(&suite).unwrap();
    adapter.end_test(&suite).unwrap();

    let groups: Vec<_> = adapter
        .reporter()
        .events()
        .iter()
        .map(|event| event.entry.group().to_owned())
        .collect();
    assert_eq!(
        groups,
        vec![
            "junit.framework.TestSuite".to_owned(),
            "junit.framework.TestSuite".to_owned(),
        ],
    );
}

#[test]
fn every_method_name_dispatches() {
    let adapter = new_adapter();
    let test = TestHandle::new(SuiteTest("names"));

    for method in ListenerMethod::ALL {
        let mut args: Vec<ListenerArg> = vec![test.clone().into()];
        if method.arity() == 2 {
            args.push(cause("x").into());
        }
        adapter.notify(method.as_str(), &args).unwrap();
    }

    let kinds: Vec<_> = adapter
        .reporter()
        .events()
        .iter()
        .map(|event| event.outcome)
        .collect();
    // addError and addFailure both record the failure, so endTest reports nothing.
    assert_eq!(
        kinds,
        vec![Outcome::Starting, Outcome::Errored, Outcome::Failed],
    );
}

#[test]
fn bad_arguments_change_nothing() {
    let adapter = new_adapter();
    let test = TestHandle::new(SuiteTest("bad"));

    let err = adapter
        .notify("addError", &[test.clone().into()])
        .unwrap_err();
    assert!(
        matches!(err, DispatchError::Arguments(_)),
        "unexpected error: {err:?}"
    );
    assert!(adapter.reporter().events().is_empty());
    assert_eq!(adapter.pending_failures(), 0);
}

#[test]
fn adapter_from_config() {
    let config = AdapterConfig::from_sources(None, None).unwrap();
    let adapter = ListenerAdapterBuilder::default()
        .set_registry_stripes(RegistryStripes::new(2).unwrap())
        .apply_config(&config)
        .build(
            Some(CollectingReporter::default()),
            Some(&()),
            Some(&LoadContext::new("tests")),
        )
        .unwrap();
    let test = TestHandle::new(SuiteTest("configured"));

    adapter.add_error(&test, &cause("boom")).unwrap();
    adapter.end_test(&test).unwrap();

    let reporter = adapter.into_reporter();
    let kinds: Vec<_> = reporter.events().iter().map(|e| e.outcome).collect();
    assert_eq!(kinds, vec![Outcome::Errored]);
}
