/// Runs `$block` through an optional Redis cache.
///
/// With `Some(cache)`, a hit is returned directly and a miss computes the
/// value, queues it for a background write and returns it. With `None` the
/// block always runs. Cache read failures count as misses.
///
/// # Arguments
/// * `$cache`: `&Option<Cache>` to consult.
/// * `$key`: the `CacheKey` for the value.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future producing an `AppResult` of the value.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => match cache.get_from_cache(&$key).await {
                Ok(Some(hit)) => Ok(hit),
                lookup => {
                    if let Err(e) = lookup {
                        tracing::warn!(error = %e, key = %$key, "Cache read failed, fetching");
                    }
                    let value = $block.await?;
                    cache.set_in_background(&$key, &value, $ttl);
                    Ok(value)
                }
            },
            None => $block.await,
        }
    }};
}
