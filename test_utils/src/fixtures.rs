use crate::Fr;
use ark_bls12_381::Bls12_381;
use ark_std::{rand::RngCore, UniformRand};
use blake2::Blake2b512;
use idemix::{
    cred_request::CredentialRequest,
    credential::Credential,
    setup::{IssuerKeypair, UserSecretKey},
};
use idemix_utils::hashing_utils::field_elem_from_try_and_incr;

pub fn issuer_setup<R: RngCore>(rng: &mut R, names: &[&str]) -> IssuerKeypair<Bls12_381> {
    let keypair =
        IssuerKeypair::<Bls12_381>::generate_using_rng::<_, Blake2b512>(rng, names).unwrap();
    keypair.public_key.check::<Blake2b512>().unwrap();
    keypair
}

/// Attribute values for an organizational unit and a role mask, hashed the same way identities do
pub fn ou_role_attributes(ou: &str, role_mask: u32) -> [Fr; 2] {
    [
        field_elem_from_try_and_incr::<Fr, Blake2b512>(ou.as_bytes()),
        Fr::from(role_mask as u64),
    ]
}

/// Blind issuance from request to a credential the user has verified
pub fn issue_credential<R: RngCore>(
    rng: &mut R,
    keypair: &IssuerKeypair<Bls12_381>,
    attributes: &[Fr],
) -> (UserSecretKey<Fr>, Credential<Bls12_381>) {
    let sk = UserSecretKey::<Fr>::new(rng);
    let issuer_nonce = Fr::rand(rng);
    let request =
        CredentialRequest::new::<_, Blake2b512>(rng, &sk, issuer_nonce, &keypair.public_key)
            .unwrap();
    request
        .verify::<Blake2b512>(&issuer_nonce, &keypair.public_key)
        .unwrap();
    let credential = Credential::issue(
        rng,
        &keypair.secret_key,
        &keypair.public_key,
        &request,
        attributes,
    )
    .unwrap();
    credential.verify(&sk, &keypair.public_key).unwrap();
    (sk, credential)
}
