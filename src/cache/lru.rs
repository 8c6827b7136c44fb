//! Recency List Module
//!
//! Doubly linked LRU ordering stored in an arena. Links are slot indices, so
//! no node owns another; two sentinel slots bound the chain.

// == Handles ==
/// Stable address of a node in the arena.
pub type NodeId = usize;

/// Sentinel slot anchoring the most recently used end
const HEAD: NodeId = 0;
/// Sentinel slot anchoring the least recently used end
const TAIL: NodeId = 1;

#[derive(Debug)]
struct Node<T> {
    /// None for sentinels and free slots
    item: Option<T>,
    prev: NodeId,
    next: NodeId,
}

impl<T> Node<T> {
    fn sentinel(prev: NodeId, next: NodeId) -> Self {
        Self {
            item: None,
            prev,
            next,
        }
    }
}

// == Recency List ==
/// Tracks access order for LRU eviction strategy.
///
/// - `HEAD.next` = Most recently used
/// - `TAIL.prev` = Least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    nodes: Vec<Node<T>>,
    /// Vacated slots available for reuse
    free: Vec<NodeId>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list holding only the two sentinels.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel(HEAD, TAIL), Node::sentinel(HEAD, TAIL)],
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores `item` at the most recently used position.
    pub fn push_front(&mut self, item: T) -> NodeId {
        let node = Node {
            item: Some(item),
            prev: HEAD,
            next: TAIL,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Touch ==
    /// Moves a live node to the most recently used position.
    pub fn move_to_front(&mut self, id: NodeId) {
        if !self.is_live(id) || self.nodes[HEAD].next == id {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Unlinks a node and returns its item. Stale ids yield None.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        self.unlink(id);
        let item = self.nodes[id].item.take();
        self.free.push(id);
        self.len -= 1;
        item
    }

    // == Peek Oldest ==
    /// Returns the least recently used node without removing it.
    pub fn back(&self) -> Option<NodeId> {
        let id = self.nodes[TAIL].prev;
        (id != HEAD).then_some(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).and_then(|node| node.item.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).and_then(|node| node.item.as_mut())
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every node and resets to two fresh sentinels.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.nodes[HEAD].next,
        }
    }

    fn is_live(&self, id: NodeId) -> bool {
        id > TAIL && self.nodes.get(id).is_some_and(|node| node.item.is_some())
    }

    fn unlink(&mut self, id: NodeId) {
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn link_front(&mut self, id: NodeId) {
        let first = self.nodes[HEAD].next;
        self.nodes[id].prev = HEAD;
        self.nodes[id].next = first;
        self.nodes[first].prev = id;
        self.nodes[HEAD].next = id;
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a [`RecencyList`], most recent first.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: NodeId,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }
        let id = self.cursor;
        let node = &self.list.nodes[id];
        self.cursor = node.next;
        node.item.as_ref().map(|item| (id, item))
    }
}
