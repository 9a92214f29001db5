//! Centralized integration tests for the component registry
use async_trait::async_trait;
use parking_lot::Mutex;
use refer_abstractions::{
    same_component, Closable, Component, ComponentRef, Openable, Referenceable, References,
    ReferencesExt, Unreferenceable,
};
use refer_common::{ContainerError, ContainerResult, Descriptor, Locator};
use refer_composition::{Container, ContainerConfig};
use refer_impl::{DependencyResolver, Factory, ManagedReferences};
use std::sync::Arc;

/// 共享的事件记录
type Journal = Arc<Mutex<Vec<String>>>;

/// 记录生命周期调用的组件
#[derive(Debug)]
struct Probe {
    name: &'static str,
    journal: Journal,
    fail_open: bool,
    fail_close: bool,
    fail_unset: bool,
}

impl Probe {
    fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: Arc::clone(journal),
            fail_open: false,
            fail_close: false,
            fail_unset: false,
        }
    }

    fn record(&self, event: &str) {
        self.journal.lock().push(format!("{}:{}", self.name, event));
    }
}

#[async_trait]
impl Referenceable for Probe {
    async fn set_references(&self, _references: Arc<dyn References>) -> ContainerResult<()> {
        self.record("set_references");
        Ok(())
    }
}

#[async_trait]
impl Unreferenceable for Probe {
    async fn unset_references(&self) -> ContainerResult<()> {
        self.record("unset_references");
        if self.fail_unset {
            return Err(ContainerError::component(format!("{} 解除引用失败", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl Closable for Probe {
    async fn close(&self) -> ContainerResult<()> {
        self.record("close");
        if self.fail_close {
            return Err(ContainerError::component(format!("{} 关闭失败", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl Openable for Probe {
    fn is_open(&self) -> bool {
        self.journal
            .lock()
            .iter()
            .rev()
            .find(|event| event.starts_with(self.name) && (event.ends_with(":open") || event.ends_with(":close")))
            .is_some_and(|event| event.ends_with(":open"))
    }

    async fn open(&self) -> ContainerResult<()> {
        if self.fail_open {
            return Err(ContainerError::component(format!("{} 打开失败", self.name)));
        }
        self.record("open");
        Ok(())
    }
}

impl Component for Probe {
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }

    fn as_unreferenceable(&self) -> Option<&dyn Unreferenceable> {
        Some(self)
    }

    fn as_openable(&self) -> Option<&dyn Openable> {
        Some(self)
    }

    fn as_closable(&self) -> Option<&dyn Closable> {
        Some(self)
    }
}

/// 默认日志组件
#[derive(Debug, Default)]
struct ConsoleLogger;

impl Component for ConsoleLogger {}

/// 需要日志依赖的组件
#[derive(Debug)]
struct Consumer {
    resolver: DependencyResolver,
    logger: Mutex<Option<ComponentRef>>,
}

impl Default for Consumer {
    fn default() -> Self {
        Self {
            resolver: DependencyResolver::from_tuples([(
                "logger",
                Descriptor::new("*", "logger", "*", "*", "1.0"),
            )]),
            logger: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Referenceable for Consumer {
    async fn set_references(&self, references: Arc<dyn References>) -> ContainerResult<()> {
        self.resolver.set_references(references).await?;
        *self.logger.lock() = Some(self.resolver.get_one_required("logger").await?);
        Ok(())
    }
}

impl Component for Consumer {
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }
}

fn logger_factory() -> Factory {
    let mut factory = Factory::new();
    factory.register_default::<ConsoleLogger>(Descriptor::new("lorn", "logger", "console", "default", "1.0"));
    factory
}

fn any_logger() -> Locator {
    Descriptor::new("*", "logger", "*", "*", "*").into()
}

fn events(journal: &Journal) -> Vec<String> {
    journal.lock().clone()
}

#[tokio::test]
async fn test_auto_construction_idempotence() -> anyhow::Result<()> {
    let references = ManagedReferences::new();
    references
        .put(
            Descriptor::new("lorn", "factory", "logger", "default", "1.0").into(),
            Arc::new(logger_factory()),
        )
        .await?;

    let first = references.get_one_required(&any_logger()).await?;
    let second = references.get_one_required(&any_logger()).await?;

    assert!(same_component(&first, &second));
    assert_eq!(references.get_optional(&any_logger()).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_lifecycle_ordering() -> anyhow::Result<()> {
    let journal = Journal::default();
    let references = ManagedReferences::new();
    references
        .put(Locator::from("probe"), Arc::new(Probe::new("probe", &journal)))
        .await?;

    references.open().await?;
    references.close().await?;

    assert_eq!(
        events(&journal),
        vec![
            "probe:set_references",
            "probe:open",
            "probe:close",
            "probe:unset_references",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_open_is_idempotent() -> anyhow::Result<()> {
    let journal = Journal::default();
    let references = ManagedReferences::new();
    references
        .put(Locator::from("probe"), Arc::new(Probe::new("probe", &journal)))
        .await?;

    references.open().await?;
    references.open().await?;
    assert_eq!(events(&journal), vec!["probe:set_references", "probe:open"]);

    references.close().await?;
    references.close().await?;
    assert_eq!(events(&journal).len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_put_and_remove_while_open() -> anyhow::Result<()> {
    let journal = Journal::default();
    let references = ManagedReferences::new();
    references.open().await?;

    let probe: ComponentRef = Arc::new(Probe::new("late", &journal));
    references.put(Locator::from("late"), probe.clone()).await?;
    assert_eq!(events(&journal), vec!["late:set_references", "late:open"]);

    let removed = references.remove(&Locator::from("late")).await?.expect("应该移除组件");
    assert!(same_component(&removed, &probe));
    assert_eq!(
        events(&journal)[2..],
        ["late:unset_references".to_string(), "late:close".to_string()]
    );

    references.close().await?;
    assert_eq!(events(&journal).len(), 4, "已移除的组件不应该再次关闭");
    Ok(())
}

#[tokio::test]
async fn test_remove_all_while_open() -> anyhow::Result<()> {
    let journal = Journal::default();
    let references = ManagedReferences::new();
    references
        .put(Locator::from("worker"), Arc::new(Probe::new("first", &journal)))
        .await?;
    references
        .put(Locator::from("worker"), Arc::new(Probe::new("second", &journal)))
        .await?;
    references.open().await?;

    let removed = references.remove_all(&Locator::from("worker")).await?;
    assert_eq!(removed.len(), 2);
    assert!(references.is_empty());

    references.close().await?;
    let events = events(&journal);
    for name in ["first", "second"] {
        for event in ["unset_references", "close"] {
            let expected = format!("{name}:{event}");
            assert_eq!(
                events.iter().filter(|recorded| **recorded == expected).count(),
                1,
                "{expected} 应该只出现一次"
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_failed_unlink_still_closes_removed_component() {
    let journal = Journal::default();
    let brittle = Probe {
        fail_unset: true,
        ..Probe::new("brittle", &journal)
    };
    let references = ManagedReferences::from_tuples(vec![
        (Locator::from("brittle"), Arc::new(brittle) as ComponentRef),
        (Locator::from("steady"), Arc::new(Probe::new("steady", &journal)) as ComponentRef),
    ]);
    references.open().await.unwrap();

    let err = references.remove_all(&Locator::from("brittle")).await.unwrap_err();
    assert!(err.to_string().contains("brittle"));
    assert_eq!(references.len(), 1);
    assert!(events(&journal).ends_with(&[
        "brittle:unset_references".to_string(),
        "brittle:close".to_string(),
    ]));

    let removal = references.take(&Locator::from("steady")).await;
    assert!(removal.error().is_none());
    assert_eq!(removal.components().len(), 1);

    references.close().await.unwrap();
    let events = events(&journal);
    assert_eq!(events.iter().filter(|event| *event == "brittle:close").count(), 1);
    assert_eq!(events.iter().filter(|event| *event == "steady:close").count(), 1);
}

#[tokio::test]
async fn test_container_closes_component_removed_after_failed_unlink() -> anyhow::Result<()> {
    let journal = Journal::default();
    let shared = Arc::clone(&journal);
    let config = ContainerConfig::from_json(r#"{"components": [{"type": "brittle"}]}"#)?;
    let container = Container::builder("teardown")
        .with_type("brittle", move || Probe {
            fail_unset: true,
            ..Probe::new("brittle", &shared)
        })
        .with_config(config)
        .build()?;

    container.open().await?;
    let references = container.references().expect("容器应该已打开");

    let removal = references.take_all(&Locator::from("brittle")).await;
    let (removed, error) = removal.into_parts();
    assert_eq!(removed.len(), 1);
    assert!(error.is_some());
    assert_eq!(
        events(&journal),
        vec![
            "brittle:set_references",
            "brittle:open",
            "brittle:unset_references",
            "brittle:close",
        ]
    );

    container.close().await?;
    assert_eq!(events(&journal).len(), 4, "已移除的组件不应该再次关闭");
    Ok(())
}

#[tokio::test]
async fn test_open_fails_fast_and_close_is_best_effort() {
    let journal = Journal::default();
    let first = Probe::new("first", &journal);
    let broken = Probe {
        fail_open: true,
        ..Probe::new("broken", &journal)
    };
    let references = ManagedReferences::from_tuples(vec![
        (Locator::from("first"), Arc::new(first) as ComponentRef),
        (Locator::from("broken"), Arc::new(broken) as ComponentRef),
        (Locator::from("last"), Arc::new(Probe::new("last", &journal)) as ComponentRef),
    ]);

    assert!(references.open().await.is_err());
    assert!(!references.is_open());
    assert!(!events(&journal).contains(&"last:open".to_string()));

    let journal = Journal::default();
    let failing = Probe {
        fail_close: true,
        ..Probe::new("failing", &journal)
    };
    let references = ManagedReferences::from_tuples(vec![
        (Locator::from("failing"), Arc::new(failing) as ComponentRef),
        (Locator::from("other"), Arc::new(Probe::new("other", &journal)) as ComponentRef),
    ]);
    references.open().await.unwrap();

    let err = references.close().await.unwrap_err();
    assert!(err.to_string().contains("failing"));
    assert!(!references.is_open());
    let events = events(&journal);
    assert!(events.contains(&"other:close".to_string()));
    assert!(events.contains(&"other:unset_references".to_string()));
}

#[tokio::test]
async fn test_managed_references_wires_default_logger() -> anyhow::Result<()> {
    let consumer = Arc::new(Consumer::default());
    let references = ManagedReferences::new();
    references
        .put(
            Descriptor::new("lorn", "factory", "logger", "default", "1.0").into(),
            Arc::new(logger_factory()),
        )
        .await?;
    references
        .put(Descriptor::new("lorn", "consumer", "default", "default", "1.0").into(), consumer.clone())
        .await?;

    references.open().await?;

    let injected = consumer.logger.lock().clone().expect("日志组件应该已注入");
    let registered = references
        .get_one_optional(&any_logger())
        .await?
        .expect("日志组件应该已注册");
    assert!(same_component(&injected, &registered));
    assert!(references.get_one_optional_as::<ConsoleLogger>(&any_logger()).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_container_wires_default_logger() -> anyhow::Result<()> {
    let config = ContainerConfig::from_json(
        r#"{"components": [{"type": "consumer", "descriptor": "lorn:consumer:default:default:1.0"}]}"#,
    )?;
    let container = Container::builder("scenario")
        .with_factory(Arc::new(logger_factory()))
        .with_type("consumer", Consumer::default)
        .with_config(config)
        .build()?;

    container.open().await?;
    let references = container.references().expect("容器应该已打开");

    let consumer = references
        .get_one_required_as::<Consumer>(&Descriptor::new("*", "consumer", "*", "*", "*").into())
        .await?;
    let injected = consumer.logger.lock().clone().expect("日志组件应该已注入");
    let logger = references
        .get_one_optional(&any_logger())
        .await?
        .expect("日志组件应该已注册");
    assert!(same_component(&injected, &logger));
    assert_eq!(references.get_optional(&any_logger()).await?.len(), 1);

    container.close().await?;
    Ok(())
}
