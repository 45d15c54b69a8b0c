//! ECDSA signature with strict DER serialization.
//!
//! Interpreters hash and compare the serialized signature bytes, so the
//! encoding must be byte-exact: minimal DER integers, low-S normalized,
//! RFC6979 deterministic nonces. Divergence here makes an otherwise valid
//! redemption unspendable.

use k256::ecdsa;
use k256::ecdsa::signature::hazmat::PrehashVerifier;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// The secp256k1 group order N, big-endian.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// N/2, the low-S boundary.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// An ECDSA signature held as fixed-width R and S scalars.
#[derive(Clone, Debug)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Wrap raw big-endian R and S values.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// Parse a DER sequence `30 <len> 02 <r> 02 <s>`.
    ///
    /// Both integers must be non-zero and below the group order; a
    /// violation is a parse error, not a verification failure.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < 8 {
            return Err(sig_err("truncated DER input"));
        }
        if bytes[0] != 0x30 {
            return Err(sig_err("missing DER sequence tag"));
        }
        let body_len = bytes[1] as usize;
        if body_len + 2 > bytes.len() || body_len + 2 < 8 {
            return Err(sig_err("DER length prefix out of range"));
        }

        let body = &bytes[2..2 + body_len];
        let (r_raw, rest) = der_integer(body)?;
        let (s_raw, rest) = der_integer(rest)?;
        if !rest.is_empty() {
            return Err(sig_err("trailing bytes inside DER sequence"));
        }

        let r = fixed_width(r_raw)?;
        let s = fixed_width(s_raw)?;

        for (name, scalar) in [("R", &r), ("S", &s)] {
            if scalar.iter().all(|&b| b == 0) {
                return Err(sig_err(&format!("{} is zero", name)));
            }
            if !lt_be(scalar, &CURVE_ORDER) {
                return Err(sig_err(&format!("{} reaches the group order", name)));
            }
        }

        Ok(Signature { r, s })
    }

    /// Serialize as DER with minimal integers and a low-S value.
    pub fn to_der(&self) -> Vec<u8> {
        let s = if gt_be(&self.s, &HALF_ORDER) {
            order_minus(&self.s)
        } else {
            self.s
        };

        let r_int = der_trim(&self.r);
        let s_int = der_trim(&s);

        let mut out = Vec::with_capacity(6 + r_int.len() + s_int.len());
        out.push(0x30);
        out.push((4 + r_int.len() + s_int.len()) as u8);
        for int in [r_int, s_int] {
            out.push(0x02);
            out.push(int.len() as u8);
            out.extend_from_slice(&int);
        }
        out
    }

    /// Sign a 32-byte message hash with deterministic nonces.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let prehash = widen_hash(hash);
        let (raw, _recovery) = priv_key
            .signing_key()
            .sign_prehash_recoverable(&prehash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r_bytes, s_bytes) = raw.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        if gt_be(&s, &HALF_ORDER) {
            s = order_minus(&s);
        }

        Ok(Signature { r, s })
    }

    /// Check this signature over `hash` against `pub_key`.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        let raw = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        pub_key
            .verifying_key()
            .verify_prehash(&widen_hash(hash), &raw)
            .is_ok()
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.s == other.s
    }
}

impl Eq for Signature {}

fn sig_err(msg: &str) -> PrimitivesError {
    PrimitivesError::InvalidSignature(msg.to_string())
}

/// Split one `02 <len> <value>` integer off the front of `buf`.
fn der_integer(buf: &[u8]) -> Result<(&[u8], &[u8]), PrimitivesError> {
    if buf.len() < 3 {
        return Err(sig_err("DER integer truncated"));
    }
    if buf[0] != 0x02 {
        return Err(sig_err("missing DER integer tag"));
    }
    let len = buf[1] as usize;
    if len == 0 || 2 + len > buf.len() {
        return Err(sig_err("bad DER integer length"));
    }
    Ok((&buf[2..2 + len], &buf[2 + len..]))
}

/// Left-pad a DER integer body to a 32-byte scalar.
fn fixed_width(raw: &[u8]) -> Result<[u8; 32], PrimitivesError> {
    let mut raw = raw;
    while raw.len() > 1 && raw[0] == 0 {
        raw = &raw[1..];
    }
    if raw.len() > 32 {
        return Err(sig_err("integer wider than 32 bytes"));
    }
    let mut out = [0u8; 32];
    out[32 - raw.len()..].copy_from_slice(raw);
    Ok(out)
}

/// Minimal DER integer body for a scalar: strip leading zeros, then pad
/// one zero back if the top bit would read as a sign.
fn der_trim(val: &[u8; 32]) -> Vec<u8> {
    let start = val.iter().position(|&b| b != 0).unwrap_or(31);
    let body = &val[start..];
    let mut out = Vec::with_capacity(body.len() + 1);
    if body[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(body);
    out
}

/// Fit an arbitrary-length hash into the 32 bytes ECDSA signs.
fn widen_hash(hash: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    if hash.len() >= 32 {
        out.copy_from_slice(&hash[..32]);
    } else {
        out[32 - hash.len()..].copy_from_slice(hash);
    }
    out
}

/// Big-endian a < b.
fn lt_be(a: &[u8; 32], b: &[u8; 32]) -> bool {
    match a.iter().zip(b.iter()).find(|(x, y)| x != y) {
        Some((x, y)) => x < y,
        None => false,
    }
}

/// Big-endian a > b.
fn gt_be(a: &[u8; 32], b: &[u8; 32]) -> bool {
    lt_be(b, a)
}

/// N - val, for folding S into the low half of the order.
fn order_minus(val: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut diff = CURVE_ORDER[i] as i16 - val[i] as i16 - borrow;
        borrow = if diff < 0 { 1 } else { 0 };
        if diff < 0 {
            diff += 256;
        }
        out[i] = diff as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;

    fn scalar(hex_str: &str) -> [u8; 32] {
        fixed_width(&hex::decode(hex_str).unwrap()).unwrap()
    }

    #[test]
    fn test_der_parse_accepts_and_rejects() {
        let good = hex::decode(
            "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41\
             0220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09",
        )
        .unwrap();
        assert!(Signature::from_der(&good).is_ok());

        assert!(Signature::from_der(&[]).is_err());

        let mut wrong_tag = good.clone();
        wrong_tag[0] = 0x31;
        assert!(Signature::from_der(&wrong_tag).is_err());

        let mut wrong_int_tag = good.clone();
        wrong_int_tag[2] = 0x03;
        assert!(Signature::from_der(&wrong_int_tag).is_err());

        let truncated = &good[..good.len() - 4];
        assert!(Signature::from_der(truncated).is_err());
    }

    #[test]
    fn test_der_encoding_shapes() {
        // Both scalars already minimal: no padding bytes appear.
        let sig = Signature::new(
            scalar("4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41"),
            scalar("181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09"),
        );
        assert_eq!(
            hex::encode(sig.to_der()),
            "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41\
             0220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09"
        );

        // S above N/2 gets folded down to N - S.
        let sig = Signature::new(
            scalar("a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404"),
            scalar("971729c7fa944b465b35250c6570a2f31acbb14b13d1565fab7330dcb2b3dfb1"),
        );
        assert_eq!(
            hex::encode(sig.to_der()),
            "3045022100a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404\
             022068e8d638056bb4b9a4cadaf39a8f5d0b9fe32b9b9b7749dc145f2db01d826190"
        );

        // The all-zero signature still has a canonical (if useless) form.
        let sig = Signature::new([0u8; 32], [0u8; 32]);
        assert_eq!(sig.to_der(), vec![0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]);
    }

    /// RFC6979 nonce derivation against the published Trezor vectors.
    #[test]
    fn test_deterministic_nonces() {
        struct Vector {
            key: &'static str,
            msg: &'static str,
            der: &'static str,
        }
        let vectors = [
            Vector {
                key: "cca9fbcc1b41e5a95d369eaa6ddcff73b61a4efaa279cfc6567e8daa39cbaf50",
                msg: "sample",
                der: "3045022100af340daf02cc15c8d5d08d7735dfe6b98a474ed373bdb5fbecf7571be52b384202205009fb27f37034a9b24b707b7c6b79ca23ddef9e25f7282e8a797efe53a8f124",
            },
            Vector {
                key: "0000000000000000000000000000000000000000000000000000000000000001",
                msg: "Satoshi Nakamoto",
                der: "3045022100934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d802202442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
            },
            Vector {
                key: "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
                msg: "Satoshi Nakamoto",
                der: "3045022100fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d002206b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5",
            },
            Vector {
                key: "f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181",
                msg: "Alan Turing",
                der: "304402207063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c022058dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea",
            },
            Vector {
                key: "0000000000000000000000000000000000000000000000000000000000000001",
                msg: "All those moments will be lost in time, like tears in rain. Time to die...",
                der: "30450221008600dbd41e348fe5c9465ab92d23e3db8b98b873beecd930736488696438cb6b0220547fe64427496db33bf66019dacbf0039c04199abb0122918601db38a72cfc21",
            },
        ];

        for v in &vectors {
            let key = PrivateKey::from_bytes(&hex::decode(v.key).unwrap()).unwrap();
            let digest = sha256(v.msg.as_bytes());
            let sig = key.sign(&digest).unwrap();
            assert_eq!(hex::encode(sig.to_der()), v.der, "vector '{}'", v.msg);
            assert!(key.pub_key().verify(&digest, &sig));
        }
    }

    #[test]
    fn test_fresh_signature_round_trips_der() {
        let key = PrivateKey::new();
        let digest = crate::hash::sha256d(b"round trip payload");
        let sig = key.sign(&digest).unwrap();

        let reparsed = Signature::from_der(&sig.to_der()).unwrap();
        assert_eq!(reparsed, sig);
        assert!(reparsed.verify(&digest, &key.pub_key()));
    }

    #[test]
    fn test_foreign_key_does_not_verify() {
        let signer = PrivateKey::new();
        let other = PrivateKey::new();
        let digest = sha256(b"addressed to one key only");
        let sig = signer.sign(&digest).unwrap();
        assert!(!other.pub_key().verify(&digest, &sig));
    }
}
