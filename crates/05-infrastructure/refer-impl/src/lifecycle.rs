//! 组件生命周期辅助工具
//!
//! 对一组组件按顺序执行一次能力调用。不具备对应能力的组件被跳过。

use refer_abstractions::{Component, ComponentRef, References};
use refer_common::ContainerResult;
use std::sync::Arc;
use tracing::{debug, warn};

/// 打开组件
///
/// 遇到第一个失败立即中止。
pub struct Opener;

impl Opener {
    /// 组件是否已打开，不可打开的组件视为已打开
    pub fn is_open_one(component: &dyn Component) -> bool {
        component.as_openable().map_or(true, |openable| openable.is_open())
    }

    /// 所有组件是否已打开
    pub fn is_open(components: &[ComponentRef]) -> bool {
        components.iter().all(|component| Self::is_open_one(&**component))
    }

    /// 打开单个组件
    pub async fn open_one(component: &dyn Component) -> ContainerResult<()> {
        if let Some(openable) = component.as_openable() {
            debug!("打开组件: {:?}", component);
            openable.open().await?;
        }
        Ok(())
    }

    /// 按顺序打开所有组件
    pub async fn open(components: &[ComponentRef]) -> ContainerResult<()> {
        for component in components {
            Self::open_one(&**component).await?;
        }
        Ok(())
    }
}

/// 关闭组件
///
/// 一个组件关闭失败不影响其余组件，返回第一个错误。
pub struct Closer;

impl Closer {
    /// 关闭单个组件
    pub async fn close_one(component: &dyn Component) -> ContainerResult<()> {
        if let Some(closable) = component.as_closable() {
            debug!("关闭组件: {:?}", component);
            closable.close().await?;
        }
        Ok(())
    }

    /// 按顺序关闭所有组件
    pub async fn close(components: &[ComponentRef]) -> ContainerResult<()> {
        let mut first_error = None;
        for component in components {
            if let Err(err) = Self::close_one(&**component).await {
                warn!("组件关闭失败: {:?}, 原因: {}", component, err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// 清理组件状态
pub struct Cleaner;

impl Cleaner {
    /// 清理单个组件
    pub async fn clear_one(component: &dyn Component) -> ContainerResult<()> {
        if let Some(cleanable) = component.as_cleanable() {
            cleanable.clear().await?;
        }
        Ok(())
    }

    /// 按顺序清理所有组件
    pub async fn clear(components: &[ComponentRef]) -> ContainerResult<()> {
        for component in components {
            Self::clear_one(&**component).await?;
        }
        Ok(())
    }
}

/// 设置和解除组件引用
pub struct Referencer;

impl Referencer {
    /// 为单个组件设置引用
    pub async fn set_references_for_one(
        references: &Arc<dyn References>,
        component: &dyn Component,
    ) -> ContainerResult<()> {
        if let Some(referenceable) = component.as_referenceable() {
            debug!("设置组件引用: {:?}", component);
            referenceable.set_references(Arc::clone(references)).await?;
        }
        Ok(())
    }

    /// 为所有组件设置引用，遇到第一个失败立即中止
    pub async fn set_references(
        references: &Arc<dyn References>,
        components: &[ComponentRef],
    ) -> ContainerResult<()> {
        for component in components {
            Self::set_references_for_one(references, &**component).await?;
        }
        Ok(())
    }

    /// 解除单个组件的引用
    pub async fn unset_references_for_one(component: &dyn Component) -> ContainerResult<()> {
        if let Some(unreferenceable) = component.as_unreferenceable() {
            debug!("解除组件引用: {:?}", component);
            unreferenceable.unset_references().await?;
        }
        Ok(())
    }

    /// 解除所有组件的引用，返回第一个错误
    pub async fn unset_references(components: &[ComponentRef]) -> ContainerResult<()> {
        let mut first_error = None;
        for component in components {
            if let Err(err) = Self::unset_references_for_one(&**component).await {
                warn!("解除组件引用失败: {:?}, 原因: {}", component, err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
