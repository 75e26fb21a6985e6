use core::fmt::{Formatter, Result as FmtResult};

use serde::de::{Deserialize, Deserializer, Error as DeError, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::GrowableString;

impl Serialize for GrowableString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

struct GrowableStringVisitor;

impl<'de> Visitor<'de> for GrowableStringVisitor {
    type Value = GrowableString;

    fn expecting(&self, fmt: &mut Formatter) -> FmtResult {
        fmt.write_str("a byte string")
    }

    fn visit_bytes<E: DeError>(self, v: &[u8]) -> Result<GrowableString, E> {
        GrowableString::from_bytes(v).map_err(E::custom)
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<GrowableString, E> {
        self.visit_bytes(v.as_bytes())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<GrowableString, A::Error> {
        let mut s = GrowableString::new().map_err(<A::Error as DeError>::custom)?;
        while let Some(b) = seq.next_element::<u8>()? {
            s.append_byte(b).map_err(<A::Error as DeError>::custom)?;
        }
        Ok(s)
    }
}

impl<'de> Deserialize<'de> for GrowableString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_bytes(GrowableStringVisitor)
    }
}
