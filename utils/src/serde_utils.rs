//! Serde serialization for `arkworks-rs` objects. These are serialized as the bytes of their compressed
//! canonical encoding so that the serde and the canonical representations carry the same data.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{io, string::ToString, vec::Vec};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// Use as `#[serde_as(as = "ArkObjectBytes")]` on a field of any type implementing
/// `CanonicalSerialize + CanonicalDeserialize`
pub struct ArkObjectBytes;

impl<T: CanonicalSerialize> SerializeAs<T> for ArkObjectBytes {
    fn serialize_as<S: Serializer>(elem: &T, serializer: S) -> Result<S::Ok, S::Error> {
        let mut bytes = Vec::with_capacity(elem.compressed_size());
        elem.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Serialize::serialize(&bytes, serializer)
    }
}

impl<'de, T: CanonicalDeserialize> DeserializeAs<'de, T> for ArkObjectBytes {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
        let bytes = <Vec<u8> as Deserialize>::deserialize(deserializer)?;
        T::deserialize_compressed(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}

/// Serde mirror of `SerializationError` so that error enums wrapping it can derive `Serialize`
#[derive(Serialize)]
#[serde(remote = "SerializationError")]
pub enum ArkSerializationError {
    NotEnoughSpace,
    InvalidData,
    UnexpectedFlags,
    #[serde(serialize_with = "io_error_string")]
    IoError(io::Error),
}

fn io_error_string<S: Serializer>(error: &io::Error, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine, G2Affine};
    use ark_std::{
        collections::BTreeMap,
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use serde_with::serde_as;

    #[serde_as]
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Bundle {
        #[serde_as(as = "ArkObjectBytes")]
        scalar: Fr,
        #[serde_as(as = "Vec<ArkObjectBytes>")]
        points: Vec<G1Affine>,
        #[serde_as(as = "BTreeMap<_, ArkObjectBytes>")]
        indexed: BTreeMap<usize, G2Affine>,
    }

    #[test]
    fn ark_objects_through_serde() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let mut indexed = BTreeMap::new();
        indexed.insert(1, G2Affine::rand(&mut rng));
        indexed.insert(4, G2Affine::rand(&mut rng));
        let bundle = Bundle {
            scalar: Fr::rand(&mut rng),
            points: (0..3).map(|_| G1Affine::rand(&mut rng)).collect(),
            indexed,
        };
        let json = serde_json::to_string(&bundle).unwrap();
        assert_eq!(serde_json::from_str::<Bundle>(&json).unwrap(), bundle);

        // Garbage bytes are a deserialization error, not a panic
        let bad = r#"{"scalar":[1,2,3],"points":[],"indexed":{}}"#;
        assert!(serde_json::from_str::<Bundle>(bad).is_err());
    }
}
