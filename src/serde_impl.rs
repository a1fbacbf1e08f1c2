use std::io::{ BufRead, BufReader, Read };

use serde::de::{ self, Deserializer, IntoDeserializer };

use crate::errors::{ ReadError, ReadResult };
use crate::reader::{ self, TokenReader };

// ============================================================================
// Deserialization
// ============================================================================

/// Reads one `T` from `text` and checks that nothing is left unread.
///
/// Scalars take one token each, structs and tuples read their fields in order,
/// sequences and maps start with a count token.
///
/// ```rust
/// #[derive(serde::Deserialize)]
/// struct Problem {
///     num: i32,
///     items: Vec<String>,
/// }
/// let p: Problem = hashcode_io::from_str("42\n3 abc def ghi").unwrap();
/// assert_eq!(p.num, 42);
/// assert_eq!(p.items, vec!["abc", "def", "ghi"]);
/// ```
pub fn from_str<T>(text: &str) -> ReadResult<T>
where T: de::DeserializeOwned {
    reader::read_text(text, |r| r.read_value())
}

/// Reads one `T` from `r` and checks that nothing is left unread.
pub fn from_reader<R, T>(r: R) -> ReadResult<T>
where
    R: Read,
    T: de::DeserializeOwned,
{
    reader::read_with(TokenReader::new(BufReader::new(r)), |r| r.read_value())
}

impl<R: BufRead> TokenReader<R> {
    /// Reads one `T` from the upcoming tokens.
    pub fn read_value<T: de::DeserializeOwned>(&mut self) -> ReadResult<T> {
        T::deserialize(&mut TokenDeserializer { reader: self })
    }
}

impl de::Error for ReadError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ReadError::Custom(msg.to_string())
    }
}

struct TokenDeserializer<'a, R: BufRead> {
    reader: &'a mut TokenReader<R>,
}

impl<'a, R: BufRead> TokenDeserializer<'a, R> {
    fn read_len(&mut self) -> ReadResult<usize> {
        self.reader.read_parsed::<usize>()
    }
}

impl<'de, 'a, 'b, R: BufRead> Deserializer<'de> for &'b mut TokenDeserializer<'a, R> {
    type Error = ReadError;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where V: de::Visitor<'de> {
        Err(ReadError::custom("Token input is not self-describing, the target type must be known"))
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_bool(self.reader.read_bool()?) }
    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_i8(self.reader.read_parsed()?) }
    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_i16(self.reader.read_parsed()?) }
    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_i32(self.reader.read_int()?) }
    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_i64(self.reader.read_long()?) }
    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_i128(self.reader.read_parsed()?) }
    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_u8(self.reader.read_parsed()?) }
    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_u16(self.reader.read_parsed()?) }
    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_u32(self.reader.read_parsed()?) }
    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_u64(self.reader.read_parsed()?) }
    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_u128(self.reader.read_parsed()?) }
    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_f32(self.reader.read_parsed()?) }
    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_f64(self.reader.read_double()?) }
    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_char(self.reader.read_parsed()?) }
    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_string(self.reader.read_token()?) }
    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_string(self.reader.read_token()?) }
    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_byte_buf(self.reader.read_token()?.into_bytes()) }
    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_byte_buf(self.reader.read_token()?.into_bytes()) }
    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_string(self.reader.read_token()?) }
    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        self.reader.read_token()?;
        visitor.visit_unit()
    }

    fn deserialize_option<V>(self, _visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        Err(ReadError::custom(format!(
            "Line {}: optional values cannot be read from tokens", self.reader.line_number()
        )))
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_unit() }
    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_unit() }
    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> { visitor.visit_newtype_struct(self) }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        let len = self.read_len()?;
        visitor.visit_seq(CountedAccess { de: self, remaining: len })
    }
    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        visitor.visit_seq(CountedAccess { de: self, remaining: len })
    }
    fn deserialize_tuple_struct<V>(self, _name: &'static str, len: usize, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        visitor.visit_seq(CountedAccess { de: self, remaining: len })
    }
    fn deserialize_struct<V>(self, _name: &'static str, fields: &'static [&'static str], visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        visitor.visit_seq(CountedAccess { de: self, remaining: fields.len() })
    }
    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        let len = self.read_len()?;
        visitor.visit_map(CountedAccess { de: self, remaining: len })
    }

    fn deserialize_enum<V>(self, _name: &'static str, _variants: &'static [&'static str], visitor: V) -> Result<V::Value, Self::Error> where V: de::Visitor<'de> {
        visitor.visit_enum(VariantAccess { de: self })
    }
}

/// Hands out a fixed number of elements (or map entries) from the token stream.
struct CountedAccess<'b, 'a, R: BufRead> {
    de: &'b mut TokenDeserializer<'a, R>,
    remaining: usize,
}

impl<'de, 'b, 'a, R: BufRead> de::SeqAccess<'de> for CountedAccess<'b, 'a, R> {
    type Error = ReadError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where T: de::DeserializeSeed<'de> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

impl<'de, 'b, 'a, R: BufRead> de::MapAccess<'de> for CountedAccess<'b, 'a, R> {
    type Error = ReadError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where K: de::DeserializeSeed<'de> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where V: de::DeserializeSeed<'de> {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// An enum is written as its variant name followed by the variant's content.
struct VariantAccess<'b, 'a, R: BufRead> {
    de: &'b mut TokenDeserializer<'a, R>,
}

impl<'de, 'b, 'a, R: BufRead> de::EnumAccess<'de> for VariantAccess<'b, 'a, R> {
    type Error = ReadError;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where V: de::DeserializeSeed<'de> {
        let name = self.de.reader.read_token()?;
        let value = seed.deserialize(IntoDeserializer::<ReadError>::into_deserializer(name))?;
        Ok((value, self))
    }
}

impl<'de, 'b, 'a, R: BufRead> de::VariantAccess<'de> for VariantAccess<'b, 'a, R> {
    type Error = ReadError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where T: de::DeserializeSeed<'de> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where V: de::Visitor<'de> {
        visitor.visit_seq(CountedAccess { de: self.de, remaining: len })
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value, Self::Error>
    where V: de::Visitor<'de> {
        visitor.visit_seq(CountedAccess { de: self.de, remaining: fields.len() })
    }
}
