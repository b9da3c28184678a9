/// Outbound requests to whatever hosts the viewer. The desktop shell only
/// logs them; an embedding host can route them to an editor.
pub trait HostNotifier {
    fn open_source(&self, node_id: &str, path: Option<&str>);
    fn reveal_in_tree(&self, node_id: &str, path: Option<&str>);
    fn expansion_requested(&self, node_id: &str);
}

pub struct LogNotifier;

impl HostNotifier for LogNotifier {
    fn open_source(&self, node_id: &str, path: Option<&str>) {
        log::info!("open source requested for {node_id} ({})", path.unwrap_or("no path"));
    }

    fn reveal_in_tree(&self, node_id: &str, path: Option<&str>) {
        log::info!("reveal in tree requested for {node_id} ({})", path.unwrap_or("no path"));
    }

    fn expansion_requested(&self, node_id: &str) {
        log::info!("neighbor expansion requested for {node_id}");
    }
}
