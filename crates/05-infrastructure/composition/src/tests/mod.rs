//! 容器组合层测试
