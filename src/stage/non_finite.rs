//! Serde representation for float-carrying values that keeps NaN and the
//! infinities.
//!
//! JSON has no spelling for non-finite numbers, so they are written as the
//! strings `"nan"`, `"inf"` and `"-inf"`. Finite values stay plain numbers.
//! Used through `#[serde(with = "super::non_finite")]` on [`super::Value`]
//! variants and on sample times.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const NAN: &str = "nan";
const INF: &str = "inf";
const NEG_INF: &str = "-inf";

/// A float, or a fixed or variable length sequence of them.
pub trait FloatRepr: Sized {
    fn serialize_repr<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;
    fn deserialize_repr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>;
}

pub fn serialize<T: FloatRepr, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    value.serialize_repr(serializer)
}

pub fn deserialize<'de, T: FloatRepr, D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
    T::deserialize_repr(deserializer)
}

fn special(v: f64) -> &'static str {
    if v.is_nan() {
        NAN
    } else if v > 0.0 {
        INF
    } else {
        NEG_INF
    }
}

struct FloatVisitor;

impl<'de> Visitor<'de> for FloatVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a number or one of \"{}\", \"{}\", \"{}\"", NAN, INF, NEG_INF)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v {
            NAN => Ok(f64::NAN),
            INF => Ok(f64::INFINITY),
            NEG_INF => Ok(f64::NEG_INFINITY),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl FloatRepr for f64 {
    fn serialize_repr<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_finite() {
            serializer.serialize_f64(*self)
        } else {
            serializer.serialize_str(special(*self))
        }
    }

    fn deserialize_repr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }
}

impl FloatRepr for f32 {
    fn serialize_repr<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_finite() {
            serializer.serialize_f32(*self)
        } else {
            serializer.serialize_str(special(*self as f64))
        }
    }

    fn deserialize_repr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FloatVisitor).map(|v| v as f32)
    }
}

/// Borrowing adapter so sequence elements go through [`FloatRepr`].
struct Repr<'a, T>(&'a T);

impl<T: FloatRepr> Serialize for Repr<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize_repr(serializer)
    }
}

struct Owned<T>(T);

impl<'de, T: FloatRepr> Deserialize<'de> for Owned<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize_repr(deserializer).map(Owned)
    }
}

fn serialize_elements<'a, T, S, I>(len: usize, items: I, serializer: S) -> Result<S::Ok, S::Error>
where
    T: FloatRepr + 'a,
    S: Serializer,
    I: IntoIterator<Item = &'a T>,
{
    let mut seq = serializer.serialize_seq(Some(len))?;
    for item in items {
        seq.serialize_element(&Repr(item))?;
    }
    seq.end()
}

struct SeqVisitor<T>(PhantomData<T>);

impl<'de, T: FloatRepr> Visitor<'de> for SeqVisitor<T> {
    type Value = Vec<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<T>, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(Owned(item)) = seq.next_element::<Owned<T>>()? {
            out.push(item);
        }
        Ok(out)
    }
}

impl<T: FloatRepr> FloatRepr for Vec<T> {
    fn serialize_repr<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_elements(self.len(), self, serializer)
    }

    fn deserialize_repr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor(PhantomData))
    }
}

impl<T: FloatRepr, const N: usize> FloatRepr for [T; N] {
    fn serialize_repr<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_elements(N, self, serializer)
    }

    fn deserialize_repr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items: Vec<T> = deserializer.deserialize_seq(SeqVisitor(PhantomData))?;
        let len = items.len();
        let expected = format!("{} elements", N);
        items
            .try_into()
            .map_err(|_| <D::Error as de::Error>::invalid_length(len, &expected.as_str()))
    }
}
