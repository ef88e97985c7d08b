//! Tests for the container builder, modules and file-based configuration

use pretty_assertions::assert_eq;
use sioc_di::prelude::*;
use sioc_di::{implements, injectable, ConfigBuilder, ContainerConfig};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

trait Tick: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug)]
struct Clock {
    started: u64,
}

static CLOCKS: AtomicU64 = AtomicU64::new(0);

impl Tick for Clock {
    fn now(&self) -> u64 {
        self.started
    }
}

implements!(dyn Tick: Clock);

struct Settings {
    name: &'static str,
}

struct Service {
    clock: Arc<Clock>,
    settings: Arc<Settings>,
}

impl Injectable for Clock {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::nullary(|| Clock {
            started: CLOCKS.fetch_add(1, Ordering::Relaxed),
        })]
    }
}

impl Injectable for Service {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            |(clock, settings): (Arc<Clock>, Arc<Settings>)| Service { clock, settings },
        )]
    }
}

mod left {
    pub struct Shadow;
}

mod right {
    pub struct Shadow;
}

impl Injectable for left::Shadow {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::nullary(|| left::Shadow)]
    }
}

impl Injectable for right::Shadow {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::nullary(|| right::Shadow)]
    }
}

injectable!(Clock, Service, left::Shadow, right::Shadow);

struct CoreModule;

impl Module for CoreModule {
    fn configure(&self, builder: &mut ContainerBuilder) {
        builder
            .value(Settings { name: "core" })
            .singleton::<Clock>();
    }
}

#[test]
fn test_builder_with_module() {
    let container = ContainerBuilder::new()
        .add_module(CoreModule)
        .add_services(|builder| {
            builder.transient::<Service>();
        })
        .build()
        .unwrap();

    let first = container.resolve::<Service>().unwrap();
    let second = container.resolve::<Service>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.clock, &second.clock));
    assert_eq!(first.settings.name, "core");
}

#[test]
fn test_builder_steps_run_in_order() {
    let mut builder = ContainerBuilder::new();
    builder.singleton::<Service>().value(Settings { name: "late" });
    let err = builder.build().unwrap_err();
    assert!(err.is_unsatisfied());

    let mut builder = ContainerBuilder::new();
    builder.value(Settings { name: "early" }).singleton::<Service>();
    let container = builder.build().unwrap();
    assert_eq!(container.lookup::<Service>().unwrap().settings.name, "early");
}

#[test]
fn test_builder_binds_trait_objects() {
    let mut builder = Container::builder();
    builder.bind::<dyn Tick, Clock>(Lifetime::Transient);
    let container = builder.build().unwrap();

    let first = container.resolve::<dyn Tick>().unwrap();
    let second = container.resolve::<dyn Tick>().unwrap();
    assert_ne!(first.now(), second.now());
    assert!(container.lookup::<dyn Tick>().is_none());

    // A transient binding hands out the target's singleton when it has one
    let mut builder = Container::builder();
    builder
        .singleton::<Clock>()
        .bind::<dyn Tick, Clock>(Lifetime::Transient);
    let container = builder.build().unwrap();

    let clock = container.lookup::<Clock>().unwrap();
    assert_eq!(container.resolve::<dyn Tick>().unwrap().now(), clock.started);
    assert_eq!(container.resolve::<dyn Tick>().unwrap().now(), clock.started);
}

#[test]
fn test_toml_services_by_name() {
    let config = ContainerConfig::from_toml(
        r#"
        max_depth = 16

        [[services]]
        service_type = "Clock"
        lifetime = "singleton"

        [[services]]
        service_type = "builder_config_tests::Service"
        lifetime = "singleton"
        "#,
    )
    .unwrap();

    let mut builder = ContainerBuilder::new();
    builder.config(config);
    // Configured services are registered before builder steps
    let err = builder.build().unwrap_err();
    assert_eq!(
        err,
        DiError::NotRegisteredImplementation {
            service: std::any::type_name::<Service>()
        }
    );

    let mut container = Container::with_config(
        ContainerConfig::from_json(
            r#"{ "services": [{ "service_type": "Clock", "lifetime": "singleton" }] }"#,
        )
        .unwrap(),
    )
    .unwrap();
    container.register_value(Settings { name: "json" }).unwrap();
    container.register_type::<Service>(false).unwrap();

    let service = container.resolve::<Service>().unwrap();
    assert!(Arc::ptr_eq(&service.clock, &container.lookup::<Clock>().unwrap()));
    assert_eq!(container.config().max_depth, 256);
}

#[test]
fn test_unknown_and_ambiguous_service_names() {
    let config = ConfigBuilder::new()
        .service("Missing", Lifetime::Singleton)
        .build()
        .unwrap();
    assert_eq!(
        Container::with_config(config).unwrap_err(),
        DiError::UnknownServiceName {
            name: "Missing".to_string()
        }
    );

    let config = ConfigBuilder::new()
        .service("Shadow", Lifetime::Transient)
        .build()
        .unwrap();
    assert!(matches!(
        Container::with_config(config).unwrap_err(),
        DiError::ConfigError(_)
    ));

    let config = ConfigBuilder::new()
        .service("builder_config_tests::left::Shadow", Lifetime::Transient)
        .build()
        .unwrap();
    let container = Container::with_config(config).unwrap();
    assert!(container.is_registered::<left::Shadow>());
    assert!(!container.is_registered::<right::Shadow>());
}

#[test]
fn test_without_declarations() {
    let config = ConfigBuilder::new()
        .include_declarations(false)
        .build()
        .unwrap();

    let container = Container::with_config(config.clone()).unwrap();
    assert!(!container.is_declared::<Clock>());
    assert!(container.resolve::<Clock>().unwrap_err().is_unsatisfied());

    let mut builder = ContainerBuilder::new();
    builder
        .config(config)
        .declare::<Clock>()
        .declare_with(Blueprint::<Settings>::new().constructor(Constructor::nullary(|| {
            Settings { name: "explicit" }
        })));
    let container = builder.build().unwrap();
    assert!(container.is_declared::<Clock>());
    assert!(container.resolve::<Clock>().is_ok());
    assert_eq!(container.resolve::<Settings>().unwrap().name, "explicit");
    assert!(container.resolve::<Service>().is_err());
}
