/// A set of logical DOU bus lines, one bit per line.
///
/// Each instrument family has its own implementation so that bit layouts of
/// different families can't be mixed up.
pub trait SignalSet: Copy + Eq + Default {
    fn bits(self) -> u16;
    fn from_bits(bits: u16) -> Self;

    fn empty() -> Self {
        Self::default()
    }

    fn contains(self, other: Self) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    fn intersects(self, other: Self) -> bool {
        self.bits() & other.bits() != 0
    }
}

/// Declares a family specific signal set with its named lines.
macro_rules! signal_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$line_meta:meta])*
                const $line:ident = $bits:expr;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
        pub struct $name(u16);

        impl $name {
            $(
                $(#[$line_meta])*
                pub const $line: $name = $name($bits);
            )+

            pub const ALL: $name = $name(0 $(| $bits)+);

            /// Lower nibble of the sample, the BCD data lines.
            pub const fn digit(self) -> u8 {
                (self.0 & 0x000f) as u8
            }
        }

        impl $crate::signals::SignalSet for $name {
            fn bits(self) -> u16 {
                self.0
            }

            fn from_bits(bits: u16) -> Self {
                $name(bits & Self::ALL.0)
            }
        }

        impl core::ops::BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: $name) {
                self.0 |= rhs.0;
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = $name;

            fn bitand(self, rhs: $name) -> $name {
                $name(self.0 & rhs.0)
            }
        }

        impl core::ops::Not for $name {
            type Output = $name;

            fn not(self) -> $name {
                $name(!self.0 & Self::ALL.0)
            }
        }
    };
}

pub(crate) use signal_set;
