macro_rules! define_digest {
    ($digest:ident, $size:expr) => {
        #[derive(Copy, Clone)]
        pub struct $digest([u8; $size]);

        impl AsRef<[u8]> for $digest {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<$digest> for Box<[u8]> {
            fn from(digest: $digest) -> Box<[u8]> {
                Box::new(digest.0)
            }
        }

        impl ::std::fmt::Debug for $digest {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}(\"", stringify!($digest))?;
                for byte in &self.0[..] {
                    write!(f, "{:02x}", byte)?;
                }
                write!(f, "\")")
            }
        }

        impl $crate::digest::Digest for $digest {}
    };
}

macro_rules! define_block {
    ($block:ident, $size:expr) => {
        #[derive(Copy, Clone)]
        pub struct $block([u8; $size]);

        impl AsRef<[u8]> for $block {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl AsMut<[u8]> for $block {
            fn as_mut(&mut self) -> &mut [u8] {
                &mut self.0
            }
        }

        impl ::std::fmt::Debug for $block {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                for byte in &self.0[..] {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }

        impl $crate::digest::engine::Block for $block {
            fn new() -> Self {
                $block([0; $size])
            }
            fn len() -> usize {
                $size
            }
        }
    };
}
