use crate::loc::Loc;
use ahash::HashMap;
use derive_visitor::{Drive, DriveMut};
use serde::{Serialize, Serializer};
use std::any::{Any, TypeId};
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Type-keyed side table for metadata that must travel with a node but has no
/// effect on what the node means, e.g. the source-map range of a synthesized
/// error.
#[derive(Default)]
pub struct NodeAssocData {
  map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl NodeAssocData {
  pub fn get<T: Any>(&self) -> Option<&T> {
    let t = TypeId::of::<T>();
    self.map.get(&t).and_then(|v| v.downcast_ref())
  }

  pub fn set<T: Any + Send + Sync>(&mut self, v: T) {
    let t = TypeId::of::<T>();
    self.map.insert(t, Box::from(v));
  }

  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
}

#[derive(Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  // Synthesized nodes borrow the location of the source they stand in for, so
  // this is not always a span of real text.
  #[drive(skip)]
  pub loc: Loc,
  pub stx: Box<S>,
  #[drive(skip)]
  pub assoc: NodeAssocData,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      stx: Box::new(stx),
      assoc: NodeAssocData::default(),
    }
  }

  /// Maps the syntax, keeping the location and associated data.
  pub fn map_stx<T: Drive + DriveMut, F: FnOnce(S) -> T>(self, f: F) -> Node<T> {
    Node {
      loc: self.loc,
      stx: Box::new(f(*self.stx)),
      assoc: self.assoc,
    }
  }

  /// Wraps the node inside another node with the same loc, with syntax derived from the provided callback.
  pub fn wrap<T: Drive + DriveMut, F: FnOnce(Node<S>) -> T>(self, f: F) -> Node<T> {
    let loc = self.loc;
    let stx = f(self);
    Node::new(loc, stx)
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::NodeAssocData;

  #[test]
  fn test_node_assoc_data() {
    struct Tag(u32);
    let mut assoc = NodeAssocData::default();
    assert!(assoc.is_empty());
    assoc.set(Tag(32));
    assert_eq!(assoc.get::<Tag>().map(|t| t.0), Some(32));
    assert!(assoc.get::<u8>().is_none());
  }
}
