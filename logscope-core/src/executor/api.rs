/// Operations a logscope instance both serves and calls on its peers.
///
/// The route a peer serves and the URL this instance calls are both derived from
/// [`ApiOperation::path`], so the two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    Search,
    ListLogs,
    TailLog,
    DownloadLog,
    CollectStats,
    Stats,
    Errors,
}

impl ApiOperation {
    pub const ALL: [ApiOperation; 7] = [
        ApiOperation::Search,
        ApiOperation::ListLogs,
        ApiOperation::TailLog,
        ApiOperation::DownloadLog,
        ApiOperation::CollectStats,
        ApiOperation::Stats,
        ApiOperation::Errors,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ApiOperation::Search => "search",
            ApiOperation::ListLogs => "list-logs",
            ApiOperation::TailLog => "tail-log",
            ApiOperation::DownloadLog => "download-log",
            ApiOperation::CollectStats => "collect-stats",
            ApiOperation::Stats => "stats",
            ApiOperation::Errors => "errors",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_matches('/');
        Self::ALL.into_iter().find(|op| op.path() == path)
    }

    /// `<endpoint>/<operation>`, unless the endpoint's last path segment already is
    /// the operation.
    pub fn url(self, endpoint: &str) -> String {
        let endpoint = endpoint.trim().trim_end_matches('/');
        let last_segment = endpoint
            .split_once("://")
            .map_or(endpoint, |(_, rest)| rest)
            .split_once('/')
            .and_then(|(_, path)| path.rsplit('/').next());
        if last_segment == Some(self.path()) {
            return endpoint.to_string();
        }
        format!("{endpoint}/{}", self.path())
    }
}
