//! 进程容器

use crate::builder::ContainerBuilder;
use crate::config::ContainerConfig;
use crate::container_references::ContainerReferences;
use parking_lot::RwLock;
use refer_abstractions::{Closable, ComponentFactory, ComponentRef, Openable, References};
use refer_common::{ContainerError, ContainerResult, Descriptor};
use refer_impl::CompositeFactory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 容器工厂在注册表中的描述符
pub fn container_factory_descriptor() -> Descriptor {
    Descriptor::new("lorn", "factory", "container", "default", "1.0")
}

/// 进程容器
///
/// 每次打开都创建新的注册表：先放入容器工厂，再按配置放入组件，最后打开
/// 所有组件。关闭时释放注册表。
pub struct Container {
    name: String,
    description: Option<String>,
    factories: Arc<CompositeFactory>,
    types: Arc<dyn ComponentFactory>,
    config: ContainerConfig,
    references: RwLock<Option<Arc<ContainerReferences>>>,
    status: RwLock<ContainerStatus>,
}

impl Container {
    /// 创建容器构建器
    pub fn builder(name: impl Into<String>) -> ContainerBuilder {
        ContainerBuilder::new(name)
    }

    pub(crate) fn new(
        name: String,
        description: Option<String>,
        factories: Arc<CompositeFactory>,
        types: Arc<dyn ComponentFactory>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            name,
            description,
            factories,
            types,
            config,
            references: RwLock::new(None),
            status: RwLock::new(ContainerStatus::Closed),
        }
    }

    /// 容器名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 容器描述
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 组件列表
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 运行状态
    pub fn status(&self) -> ContainerStatus {
        *self.status.read()
    }

    /// 容器是否已打开
    pub fn is_open(&self) -> bool {
        self.references
            .read()
            .as_ref()
            .is_some_and(|references| references.is_open())
    }

    /// 当前的注册表，容器关闭时为空
    pub fn references(&self) -> Option<Arc<ContainerReferences>> {
        self.references.read().clone()
    }

    fn set_status(&self, status: ContainerStatus) {
        *self.status.write() = status;
    }

    async fn populate(&self, references: &ContainerReferences) -> ContainerResult<()> {
        let factories: ComponentRef = self.factories.clone();
        references
            .put(container_factory_descriptor().into(), factories)
            .await?;
        references.put_from_config(&self.config).await?;
        references.open().await
    }

    /// 打开容器
    ///
    /// 已打开时直接返回。失败时关闭已打开的部分，容器保持关闭状态。
    pub async fn open(&self) -> ContainerResult<()> {
        if self.is_open() {
            return Ok(());
        }

        info!("打开容器: {}", self.name);
        self.set_status(ContainerStatus::Opening);
        let references = Arc::new(ContainerReferences::with_types(Arc::clone(&self.types)));

        if let Err(err) = self.populate(&references).await {
            error!("容器打开失败: {}, 原因: {}", self.name, err);
            if let Err(close_err) = references.close().await {
                warn!("关闭部分打开的容器失败: {}, 原因: {}", self.name, close_err);
            }
            self.set_status(ContainerStatus::Failed);
            return Err(err);
        }

        *self.references.write() = Some(references);
        self.set_status(ContainerStatus::Open);
        info!("容器已打开: {}", self.name);
        Ok(())
    }

    /// 关闭容器
    ///
    /// 尽力关闭所有组件，返回第一个错误。
    pub async fn close(&self) -> ContainerResult<()> {
        let Some(references) = self.references.write().take() else {
            return Ok(());
        };

        info!("关闭容器: {}", self.name);
        self.set_status(ContainerStatus::Closing);
        let result = references.close().await;
        self.set_status(ContainerStatus::Closed);

        match &result {
            Ok(()) => info!("容器已关闭: {}", self.name),
            Err(err) => warn!("容器关闭时出现错误: {}, 原因: {}", self.name, err),
        }
        result
    }

    /// 打开容器，等待 Ctrl-C 后关闭
    pub async fn run_until_shutdown(&self) -> ContainerResult<()> {
        self.open().await?;
        info!("容器运行中, 按 Ctrl-C 退出: {}", self.name);

        tokio::signal::ctrl_c()
            .await
            .map_err(|e| ContainerError::component_with_source("等待关闭信号失败", e))?;

        info!("收到关闭信号: {}", self.name);
        self.close().await
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("status", &self.status())
            .field("components", &self.config.len())
            .finish()
    }
}

/// 容器运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerStatus {
    /// 已关闭
    Closed,
    /// 打开中
    Opening,
    /// 已打开
    Open,
    /// 关闭中
    Closing,
    /// 打开失败
    Failed,
}
