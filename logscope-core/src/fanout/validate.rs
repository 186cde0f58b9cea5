use crate::error::{LogscopeError, Result};
use crate::model::{
    CollectStatsRequest, ErrorsRequest, HostDetails, SearchRequest, StatsRequest, TailLogRequest,
};

pub(super) fn search(req: &SearchRequest) -> Result<()> {
    if req.value.trim().is_empty() {
        return Err(LogscopeError::validation("search value must not be blank"));
    }
    if req.hosts.is_empty() {
        return Err(LogscopeError::validation("search needs at least one host"));
    }
    req.hosts.iter().try_for_each(host)
}

pub(super) fn host(h: &HostDetails) -> Result<()> {
    if h.endpoint.trim().is_empty() {
        return Err(LogscopeError::validation("host endpoint must not be blank"));
    }
    if h.paths.is_empty() {
        return Err(LogscopeError::validation(format!(
            "host '{}' lists no log paths",
            h.endpoint
        )));
    }
    Ok(())
}

pub(super) fn target(endpoint: &str, log: &str) -> Result<()> {
    if endpoint.trim().is_empty() {
        return Err(LogscopeError::validation("endpoint must not be blank"));
    }
    if log.trim().is_empty() {
        return Err(LogscopeError::validation("log path must not be blank"));
    }
    Ok(())
}

pub(super) fn tail(req: &TailLogRequest) -> Result<()> {
    target(&req.endpoint, &req.log)
}

pub(super) fn stats(req: &StatsRequest) -> Result<()> {
    target(&req.endpoint, &req.log)
}

pub(super) fn errors(req: &ErrorsRequest) -> Result<()> {
    stats(&req.stats)
}

pub(super) fn collect(req: &CollectStatsRequest) -> Result<()> {
    stats(&req.stats)?;
    if req.date.trim().is_empty() {
        return Err(LogscopeError::validation("collect date must not be blank"));
    }
    Ok(())
}
