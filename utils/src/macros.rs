/// Concatenates supplied slices into one continuous vector.
#[macro_export]
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Returns `Err($error($left, $right))` from the enclosing function if `$left != $right`.
#[macro_export]
macro_rules! expect_equality {
    ($left: expr, $right: expr, $error: expr) => {
        if $left != $right {
            return Err($error($left, $right));
        }
    };
}

/// Serializes each of the given `CanonicalSerialize` objects in compressed form into `$writer`,
/// returning early from the enclosing function on failure.
#[macro_export]
macro_rules! serialize_all {
    ($writer: expr, $($obj: expr),+ $(,)?) => {
        $(
            ark_serialize::CanonicalSerialize::serialize_compressed($obj, &mut $writer)?;
        )+
    };
}

#[cfg(test)]
mod tests {
    use ark_bls12_381::G1Affine;
    use ark_ec::AffineRepr;
    use ark_serialize::{CanonicalSerialize, SerializationError};
    use ark_std::vec::Vec;

    #[test]
    fn concat() {
        let v = concat_slices!([1u8, 2], b"ab", 7u32.to_le_bytes());
        assert_eq!(v, [1, 2, b'a', b'b', 7, 0, 0, 0]);
    }

    #[test]
    fn equality() {
        #[derive(Debug)]
        enum Err {
            Unequal(usize, usize),
        }
        fn check(len: usize) -> Result<usize, Err> {
            expect_equality!(len, 2, Err::Unequal);
            Ok(len)
        }
        assert!(check(2).is_ok());
        assert!(matches!(check(3), Err(Err::Unequal(3, 2))));
    }

    #[test]
    fn serialize_many() {
        fn write(g: &G1Affine) -> Result<Vec<u8>, SerializationError> {
            let mut bytes = Vec::new();
            serialize_all!(bytes, g, g, &5u64);
            Ok(bytes)
        }
        let g = G1Affine::generator();
        let bytes = write(&g).unwrap();
        assert_eq!(bytes.len(), 2 * g.compressed_size() + 8);
    }
}
