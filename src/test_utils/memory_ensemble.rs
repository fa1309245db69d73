//! In-memory stand-in for a coordination service and its native client.
//!
//! Keeps a znode tree and delivers notifications from a background thread
//! through its own [`Dispatcher`], so tests exercise the same cross-thread
//! path the native client takes without a live server or a shared global
//! registry.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::ffi::CStr;
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crossbeam_channel::unbounded;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::debug;
use tracing::trace;

use crate::constants::ANY_VERSION;
use crate::constants::ZBADARGUMENTS;
use crate::constants::ZBADVERSION;
use crate::constants::ZINVALIDSTATE;
use crate::constants::ZNOCHILDRENFOREPHEMERALS;
use crate::constants::ZNODEEXISTS;
use crate::constants::ZNONODE;
use crate::constants::ZNOTEMPTY;
use crate::constants::ZOK;
use crate::constants::ZOO_CHANGED_EVENT;
use crate::constants::ZOO_CHILD_EVENT;
use crate::constants::ZOO_CONNECTED_STATE;
use crate::constants::ZOO_CREATED_EVENT;
use crate::constants::ZOO_DELETED_EVENT;
use crate::constants::ZOO_EPHEMERAL;
use crate::constants::ZOO_EXPIRED_SESSION_STATE;
use crate::constants::ZOO_SEQUENCE;
use crate::constants::ZOO_SESSION_EVENT;
use crate::constants::ZSESSIONEXPIRED;
use crate::Connector;
use crate::Dispatcher;
use crate::ExchangeBuffer;
use crate::NativeHandle;
use crate::NodeStat;
use crate::SessionId;
use crate::SessionRegistry;
use crate::ZkError;
use crate::ZkResult;

/// Connection string accepted by [`MemoryEnsemble`]
pub const MEMORY_HOSTS: &str = "memory:2181";

struct Notification {
    event: i32,
    state: i32,
    path: String,
    context: usize,
}

struct Znode {
    /// `None` for a node created with a null payload
    data: Option<Vec<u8>>,
    stat: NodeStat,
    children: BTreeSet<String>,
}

impl Znode {
    fn new(
        data: &[u8],
        stat: NodeStat,
    ) -> Self {
        Self {
            data: if data.is_empty() { None } else { Some(data.to_vec()) },
            stat,
            children: BTreeSet::new(),
        }
    }
}

struct Tree {
    nodes: BTreeMap<String, Znode>,
    last_zxid: i64,
    /// One-shot watches left by get/exists, keyed by path
    data_watches: HashMap<String, HashSet<usize>>,
    /// One-shot watches left by get_children, keyed by path
    child_watches: HashMap<String, HashSet<usize>>,
    /// Raw connection state of every handle, keyed by context
    clients: HashMap<usize, i32>,
}

struct EnsembleInner {
    hosts: String,
    dispatcher: Arc<Dispatcher>,
    tree: Mutex<Tree>,
    notifier: Sender<Notification>,
}

/// In-memory coordination service implementing [`Connector`]
#[derive(Clone)]
pub struct MemoryEnsemble {
    inner: Arc<EnsembleInner>,
}

impl MemoryEnsemble {
    pub fn new() -> Self {
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(SessionRegistry::new())));
        let (notifier, rx) = unbounded::<Notification>();

        let thread_dispatcher = dispatcher.clone();
        thread::Builder::new()
            .name("memory-ensemble-notifier".into())
            .spawn(move || {
                // Ends once the ensemble and all its handles are gone
                for n in rx.iter() {
                    thread_dispatcher.dispatch(n.event, n.state, &n.path, n.context);
                }
            })
            .expect("notifier thread can be spawned");

        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Znode::new(&[], NodeStat::default()));

        Self {
            inner: Arc::new(EnsembleInner {
                hosts: MEMORY_HOSTS.to_string(),
                dispatcher,
                tree: Mutex::new(Tree {
                    nodes,
                    last_zxid: 0,
                    data_watches: HashMap::new(),
                    child_watches: HashMap::new(),
                    clients: HashMap::new(),
                }),
                notifier,
            }),
        }
    }

    pub fn hosts(&self) -> &str {
        &self.inner.hosts
    }

    /// Registry of the sessions opened against this ensemble.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.inner.dispatcher.registry().clone()
    }

    pub fn contains_node(
        &self,
        path: &str,
    ) -> bool {
        self.inner.tree.lock().nodes.contains_key(path)
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.inner.tree.lock().clients.len()
    }

    /// Queues a notification exactly as the native client would raise it.
    pub fn notify_raw(
        &self,
        event: i32,
        state: i32,
        path: &str,
        context: usize,
    ) {
        self.inner.send(vec![Notification {
            event,
            state,
            path: path.to_string(),
            context,
        }]);
    }

    /// Expires a session: its ephemerals go, its watches are dropped and it
    /// receives a session event in the expired state.
    pub fn expire(
        &self,
        id: SessionId,
    ) {
        let context = id.as_context();
        let mut events = Vec::new();
        {
            let mut tree = self.inner.tree.lock();
            if !tree.clients.contains_key(&context) {
                return;
            }
            tree.clients.insert(context, ZOO_EXPIRED_SESSION_STATE);
            tree.release_session(context, &mut events);
        }
        events.push(Notification {
            event: ZOO_SESSION_EVENT,
            state: ZOO_EXPIRED_SESSION_STATE,
            path: String::new(),
            context,
        });
        debug!(session_id = %id, "memory ensemble expired session");
        self.inner.send(events);
    }
}

impl Default for MemoryEnsemble {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MemoryEnsemble {
    fn dispatcher(&self) -> Arc<Dispatcher> {
        self.inner.dispatcher.clone()
    }

    fn connect(
        &self,
        hosts: &CStr,
        recv_timeout_ms: i32,
        context: SessionId,
    ) -> ZkResult<Box<dyn NativeHandle>> {
        let hosts = match hosts.to_str() {
            Ok(hosts) if !hosts.trim().is_empty() && recv_timeout_ms > 0 => hosts,
            _ => return Err(ZkError::from_init_errno(Some(libc::EINVAL))),
        };
        if !hosts.split(',').any(|h| h.trim() == self.inner.hosts) {
            debug!(hosts, "no ensemble listening");
            return Err(ZkError::from_init_errno(Some(libc::ECONNREFUSED)));
        }

        let context = context.as_context();
        self.inner.tree.lock().clients.insert(context, ZOO_CONNECTED_STATE);
        self.inner.send(vec![Notification {
            event: ZOO_SESSION_EVENT,
            state: ZOO_CONNECTED_STATE,
            path: String::new(),
            context,
        }]);

        Ok(Box::new(MemoryHandle {
            inner: self.inner.clone(),
            context,
        }))
    }
}

impl EnsembleInner {
    fn send(
        &self,
        events: Vec<Notification>,
    ) {
        for n in events {
            trace!(context = n.context, event = n.event, path = %n.path, "memory ensemble notification");
            let _ = self.notifier.send(n);
        }
    }

    /// Runs one request for `context` against the tree and publishes the
    /// notifications it triggered.
    fn run(
        &self,
        context: usize,
        op: impl FnOnce(&mut Tree, &mut Vec<Notification>) -> i32,
    ) -> i32 {
        let mut events = Vec::new();
        let rc = {
            let mut tree = self.tree.lock();
            match tree.clients.get(&context) {
                None => return ZINVALIDSTATE,
                Some(&ZOO_EXPIRED_SESSION_STATE) => return ZSESSIONEXPIRED,
                Some(_) => op(&mut tree, &mut events),
            }
        };
        self.send(events);
        rc
    }
}

struct MemoryHandle {
    inner: Arc<EnsembleInner>,
    context: usize,
}

impl NativeHandle for MemoryHandle {
    fn create(
        &self,
        path: &CStr,
        value: &[u8],
        flags: i32,
        path_buffer: &mut ExchangeBuffer,
    ) -> i32 {
        let Ok(path) = path.to_str() else {
            return ZBADARGUMENTS;
        };
        let owner = self.context;
        self.inner.run(self.context, |tree, events| {
            match tree.create(path, value, flags, owner, events) {
                Ok(created) => {
                    path_buffer.write_path(&created);
                    ZOK
                }
                Err(rc) => rc,
            }
        })
    }

    fn delete(
        &self,
        path: &CStr,
        version: i32,
    ) -> i32 {
        let Ok(path) = path.to_str() else {
            return ZBADARGUMENTS;
        };
        self.inner.run(self.context, |tree, events| tree.delete(path, version, events))
    }

    fn exists(
        &self,
        path: &CStr,
        watch: bool,
        stat: &mut NodeStat,
    ) -> i32 {
        let Ok(path) = path.to_str() else {
            return ZBADARGUMENTS;
        };
        let context = self.context;
        self.inner.run(self.context, |tree, _| {
            if !valid_path(path) {
                return ZBADARGUMENTS;
            }
            if watch {
                tree.watch_data(path, context);
            }
            match tree.nodes.get(path) {
                Some(node) => {
                    *stat = node.stat;
                    ZOK
                }
                None => ZNONODE,
            }
        })
    }

    fn get(
        &self,
        path: &CStr,
        watch: bool,
        buffer: &mut ExchangeBuffer,
        stat: &mut NodeStat,
    ) -> i32 {
        let Ok(path) = path.to_str() else {
            return ZBADARGUMENTS;
        };
        let context = self.context;
        self.inner.run(self.context, |tree, _| {
            if !valid_path(path) {
                return ZBADARGUMENTS;
            }
            let Some(node) = tree.nodes.get(path) else {
                return ZNONODE;
            };
            match &node.data {
                Some(data) => {
                    buffer.fill(data);
                }
                None => buffer.fill_null(),
            }
            *stat = node.stat;
            if watch {
                tree.watch_data(path, context);
            }
            ZOK
        })
    }

    fn set(
        &self,
        path: &CStr,
        value: &[u8],
        version: i32,
    ) -> i32 {
        let Ok(path) = path.to_str() else {
            return ZBADARGUMENTS;
        };
        self.inner.run(self.context, |tree, events| tree.set(path, value, version, events))
    }

    fn get_children(
        &self,
        path: &CStr,
        watch: bool,
        children: &mut Vec<String>,
    ) -> i32 {
        let Ok(path) = path.to_str() else {
            return ZBADARGUMENTS;
        };
        let context = self.context;
        self.inner.run(self.context, |tree, _| {
            if !valid_path(path) {
                return ZBADARGUMENTS;
            }
            let Some(node) = tree.nodes.get(path) else {
                return ZNONODE;
            };
            *children = node.children.iter().cloned().collect();
            if watch {
                tree.child_watches.entry(path.to_string()).or_default().insert(context);
            }
            ZOK
        })
    }

    fn state(&self) -> i32 {
        self.inner.tree.lock().clients.get(&self.context).copied().unwrap_or(0)
    }

    fn close(&mut self) -> i32 {
        let mut events = Vec::new();
        {
            let mut tree = self.inner.tree.lock();
            if tree.clients.remove(&self.context).is_none() {
                return ZOK;
            }
            tree.release_session(self.context, &mut events);
        }
        self.inner.send(events);
        ZOK
    }
}

impl Tree {
    fn next_zxid(&mut self) -> i64 {
        self.last_zxid += 1;
        self.last_zxid
    }

    fn watch_data(
        &mut self,
        path: &str,
        context: usize,
    ) {
        self.data_watches.entry(path.to_string()).or_default().insert(context);
    }

    fn create(
        &mut self,
        path: &str,
        value: &[u8],
        flags: i32,
        owner: usize,
        events: &mut Vec<Notification>,
    ) -> Result<String, i32> {
        if !valid_path(path) || flags & !(ZOO_EPHEMERAL | ZOO_SEQUENCE) != 0 {
            return Err(ZBADARGUMENTS);
        }
        if path == "/" {
            return Err(ZNODEEXISTS);
        }
        let parent_path = parent_of(path).to_string();
        let (parent_is_ephemeral, parent_cversion) = match self.nodes.get(&parent_path) {
            Some(parent) => (parent.stat.ephemeral_owner != 0, parent.stat.cversion),
            None => return Err(ZNONODE),
        };
        if parent_is_ephemeral {
            return Err(ZNOCHILDRENFOREPHEMERALS);
        }

        let path = if flags & ZOO_SEQUENCE != 0 {
            format!("{}{:010}", path, parent_cversion)
        } else {
            path.to_string()
        };
        if self.nodes.contains_key(&path) {
            return Err(ZNODEEXISTS);
        }

        let zxid = self.next_zxid();
        let now = now_ms();
        let stat = NodeStat {
            czxid: zxid,
            mzxid: zxid,
            pzxid: zxid,
            ctime: now,
            mtime: now,
            ephemeral_owner: if flags & ZOO_EPHEMERAL != 0 { owner as i64 } else { 0 },
            data_length: value.len() as i32,
            ..NodeStat::default()
        };
        self.nodes.insert(path.clone(), Znode::new(value, stat));
        if let Some(parent) = self.nodes.get_mut(&parent_path) {
            parent.children.insert(base_name(&path).to_string());
            parent.stat.cversion += 1;
            parent.stat.num_children += 1;
            parent.stat.pzxid = zxid;
        }

        self.fire(&path, ZOO_CREATED_EVENT, true, false, events);
        self.fire(&parent_path, ZOO_CHILD_EVENT, false, true, events);
        Ok(path)
    }

    fn delete(
        &mut self,
        path: &str,
        version: i32,
        events: &mut Vec<Notification>,
    ) -> i32 {
        if !valid_path(path) || path == "/" {
            return ZBADARGUMENTS;
        }
        let Some(node) = self.nodes.get(path) else {
            return ZNONODE;
        };
        if version != ANY_VERSION && version != node.stat.version {
            return ZBADVERSION;
        }
        if !node.children.is_empty() {
            return ZNOTEMPTY;
        }
        self.remove_node(path, events);
        ZOK
    }

    fn set(
        &mut self,
        path: &str,
        value: &[u8],
        version: i32,
        events: &mut Vec<Notification>,
    ) -> i32 {
        if !valid_path(path) {
            return ZBADARGUMENTS;
        }
        match self.nodes.get(path) {
            None => return ZNONODE,
            Some(node) if version != ANY_VERSION && version != node.stat.version => return ZBADVERSION,
            Some(_) => {}
        }
        let zxid = self.next_zxid();
        if let Some(node) = self.nodes.get_mut(path) {
            node.data = if value.is_empty() { None } else { Some(value.to_vec()) };
            node.stat.version += 1;
            node.stat.mzxid = zxid;
            node.stat.mtime = now_ms();
            node.stat.data_length = value.len() as i32;
        }
        self.fire(path, ZOO_CHANGED_EVENT, true, false, events);
        ZOK
    }

    fn remove_node(
        &mut self,
        path: &str,
        events: &mut Vec<Notification>,
    ) {
        if self.nodes.remove(path).is_none() {
            return;
        }
        let parent_path = parent_of(path).to_string();
        let zxid = self.next_zxid();
        if let Some(parent) = self.nodes.get_mut(&parent_path) {
            parent.children.remove(base_name(path));
            parent.stat.cversion += 1;
            parent.stat.num_children -= 1;
            parent.stat.pzxid = zxid;
        }
        self.fire(path, ZOO_DELETED_EVENT, true, true, events);
        self.fire(&parent_path, ZOO_CHILD_EVENT, false, true, events);
    }

    /// Drops every watch held by `context` and deletes its ephemerals.
    fn release_session(
        &mut self,
        context: usize,
        events: &mut Vec<Notification>,
    ) {
        for watchers in self.data_watches.values_mut().chain(self.child_watches.values_mut()) {
            watchers.remove(&context);
        }
        let owned: Vec<String> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.stat.ephemeral_owner == context as i64)
            .map(|(path, _)| path.clone())
            .collect();
        for path in owned {
            self.remove_node(&path, events);
        }
    }

    /// Consumes the matching one-shot watches on `path`. A session watching
    /// the path both ways is notified once.
    fn fire(
        &mut self,
        path: &str,
        event: i32,
        data: bool,
        child: bool,
        events: &mut Vec<Notification>,
    ) {
        let mut contexts = HashSet::new();
        if data {
            contexts.extend(self.data_watches.remove(path).unwrap_or_default());
        }
        if child {
            contexts.extend(self.child_watches.remove(path).unwrap_or_default());
        }
        for context in contexts {
            events.push(Notification {
                event,
                state: ZOO_CONNECTED_STATE,
                path: path.to_string(),
                context,
            });
        }
    }
}

fn valid_path(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    path.starts_with('/') && !path.ends_with('/') && !path.contains("//")
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
