//! 对象缓存
//!
//! 后端通过 `declare_object_cache_plugin!` 在启动前注册，运行时按配置的名称构造。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache, ObjectCacheExt};

/// 声明一个缓存插件，在进程启动时自动注册到全局注册表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::CampusError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}

/// 已登录用户的缓存键
pub fn user_session_key(token: &str) -> String {
    format!("user:{token}")
}

/// 用户 ID 到其 access token 集合的索引键，用于按用户失效会话
pub fn user_tokens_key(user_id: i64) -> String {
    format!("user_tokens:{user_id}")
}

/// 清除某个用户的全部已缓存会话
pub async fn evict_user_sessions(cache: &dyn ObjectCache, user_id: i64) {
    let index_key = user_tokens_key(user_id);
    if let CacheResult::Found(tokens) = cache.get_json::<Vec<String>>(&index_key).await {
        for token in tokens {
            cache.remove(&user_session_key(&token)).await;
        }
    }
    cache.remove(&index_key).await;
}

/// 记录 token 归属，便于之后 `evict_user_sessions`
pub async fn remember_user_token(cache: &dyn ObjectCache, user_id: i64, token: &str, ttl: u64) {
    let index_key = user_tokens_key(user_id);
    let mut tokens = match cache.get_json::<Vec<String>>(&index_key).await {
        CacheResult::Found(tokens) => tokens,
        _ => Vec::new(),
    };
    if !tokens.iter().any(|t| t == token) {
        tokens.push(token.to_string());
    }
    // 只保留最近的若干个 token
    if tokens.len() > 16 {
        let overflow = tokens.len() - 16;
        tokens.drain(..overflow);
    }
    cache.insert_json(index_key, &tokens, ttl).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MapCache {
        inner: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl ObjectCache for MapCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            match self.inner.lock().await.get(key) {
                Some(v) => CacheResult::Found(v.clone()),
                None => CacheResult::NotFound,
            }
        }

        async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
            self.inner.lock().await.insert(key, value);
        }

        async fn remove(&self, key: &str) {
            self.inner.lock().await.remove(key);
        }

        async fn invalidate_all(&self) {
            self.inner.lock().await.clear();
        }
    }

    #[tokio::test]
    async fn test_evict_user_sessions_removes_every_token() {
        let cache = MapCache::default();
        for token in ["a", "b"] {
            cache
                .insert_raw(user_session_key(token), "{}".to_string(), 0)
                .await;
            remember_user_token(&cache, 7, token, 0).await;
        }
        cache
            .insert_raw(user_session_key("other"), "{}".to_string(), 0)
            .await;

        evict_user_sessions(&cache, 7).await;

        assert!(matches!(
            cache.get_raw(&user_session_key("a")).await,
            CacheResult::NotFound
        ));
        assert!(matches!(
            cache.get_raw(&user_session_key("b")).await,
            CacheResult::NotFound
        ));
        assert!(matches!(
            cache.get_raw(&user_session_key("other")).await,
            CacheResult::Found(_)
        ));
    }

    #[tokio::test]
    async fn test_remember_user_token_deduplicates() {
        let cache = MapCache::default();
        remember_user_token(&cache, 1, "t", 0).await;
        remember_user_token(&cache, 1, "t", 0).await;
        match cache.get_json::<Vec<String>>(&user_tokens_key(1)).await {
            CacheResult::Found(tokens) => assert_eq!(tokens, vec!["t".to_string()]),
            _ => panic!("token index missing"),
        }
    }
}
