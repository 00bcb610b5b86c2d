use ark_bls12_381::Bls12_381;
use ark_serialize::CanonicalDeserialize;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use blake2::Blake2b512;
use idemix::{
    error::IdemixError,
    nym::Pseudonym,
    setup::{IssuerKeypair, IssuerPublicKey, UserSecretKey},
    signature::Signature,
};
use idemix_msp::{
    error::MspError,
    identity::IDENTITY_DISCLOSURE,
    plain::verify_serialized,
    role::{role_to_mask, MspRole},
    serialized::{SerializedIdemixIdentity, SerializedIdentity},
    IdemixIdentity, IdemixSigningIdentity, PlainKeySigner, SigningIdentity, ATTRIBUTE_NAMES,
};
use sha2::Sha256;
use std::sync::Arc;
use test_utils::{
    fixtures::{issue_credential, issuer_setup, ou_role_attributes},
    test_serialization, Fr, G1,
};

const MSP_ID: &str = "Org1MSP";

fn setup(
    rng: &mut StdRng,
    ou: &str,
    role_mask: u32,
) -> (
    IssuerKeypair<Bls12_381>,
    Arc<IssuerPublicKey<Bls12_381>>,
    UserSecretKey<Fr>,
    idemix::credential::Credential<Bls12_381>,
) {
    let keypair = issuer_setup(rng, &ATTRIBUTE_NAMES);
    let ipk = Arc::new(keypair.public_key.clone());
    let (sk, cred) = issue_credential(rng, &keypair, &ou_role_attributes(ou, role_mask));
    (keypair, ipk, sk, cred)
}

fn construction_error(result: Result<IdemixSigningIdentity<Bls12_381>, MspError>) -> MspError {
    match result {
        Err(MspError::IdentityConstruction(e)) => *e,
        Err(e) => panic!("error not wrapped: {:?}", e),
        Ok(_) => panic!("identity must not be created"),
    }
}

#[test]
fn member_of_org1() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let role_mask = role_to_mask(&[MspRole::Member]);
    let (_, ipk, sk, cred) = setup(&mut rng, "org1", role_mask);

    let signer = IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
        &mut rng,
        MSP_ID,
        ipk.clone(),
        cred,
        sk,
        "org1",
        role_mask,
    )
    .unwrap();
    assert_eq!(signer.identity().ou(), "org1");
    assert_eq!(signer.identity().role_mask(), 1);

    let sig = signer.sign::<_, Blake2b512>(&mut rng, b"tx-42").unwrap();
    signer
        .verify_signature::<Blake2b512>(b"tx-42", &sig)
        .unwrap();
    assert!(signer
        .verify_signature::<Blake2b512>(b"tx-43", &sig)
        .is_err());

    // What a remote verifier does
    let serialized = signer.serialize().unwrap();
    test_serialization!(SerializedIdentity, serialized);
    let bytes = serialized.to_bytes().unwrap();
    let received = SerializedIdentity::from_bytes(&bytes).unwrap();
    let identity =
        IdemixIdentity::<Bls12_381>::from_serialized::<Blake2b512>(&received, ipk.clone())
            .unwrap();
    assert_eq!(identity.msp_id(), MSP_ID);
    assert_eq!(identity.ou(), "org1");
    assert_eq!(identity.role_mask(), 1);
    assert_eq!(identity.roles(), vec![MspRole::Member]);
    assert_eq!(identity.nym(), signer.identity().nym());
    identity
        .verify_signature::<Blake2b512>(b"tx-42", &sig)
        .unwrap();
    assert!(identity
        .verify_signature::<Blake2b512>(b"tx-42", &sig[..sig.len() - 1])
        .is_err());

    // The proof in the payload discloses exactly the organizational unit and the role
    let payload = SerializedIdemixIdentity::from_bytes(&serialized.id_bytes).unwrap();
    let proof = Signature::<Bls12_381>::deserialize_compressed(payload.proof.as_slice()).unwrap();
    let attrs = ou_role_attributes("org1", 1);
    assert_eq!(proof.revealed_attributes().len(), IDENTITY_DISCLOSURE.len());
    assert_eq!(proof.revealed_attributes()[&0], attrs[0]);
    assert_eq!(proof.revealed_attributes()[&1], Fr::from(1u64));
    assert_eq!(payload.ou, b"org1".to_vec());
    assert_eq!(payload.role, vec![0, 0, 0, 1]);
}

#[test]
fn identities_of_same_user_are_unlinkable() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let role_mask = role_to_mask(&[MspRole::Member, MspRole::Peer]);
    let (_, ipk, sk, cred) = setup(&mut rng, "org1", role_mask);

    let id1 = IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
        &mut rng,
        MSP_ID,
        ipk.clone(),
        cred.clone(),
        sk.clone(),
        "org1",
        role_mask,
    )
    .unwrap();
    let id2 = IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
        &mut rng,
        MSP_ID,
        ipk.clone(),
        cred,
        sk,
        "org1",
        role_mask,
    )
    .unwrap();
    assert_ne!(id1.identity().nym(), id2.identity().nym());
    assert_ne!(id1.proof().A_prime, id2.proof().A_prime);
    assert_eq!(
        id1.identity().roles(),
        vec![MspRole::Member, MspRole::Peer]
    );

    let sig = id1.sign::<_, Blake2b512>(&mut rng, b"tx-42").unwrap();
    id1.verify_signature::<Blake2b512>(b"tx-42", &sig).unwrap();
    assert!(matches!(
        id2.verify_signature::<Blake2b512>(b"tx-42", &sig),
        Err(MspError::Idemix(IdemixError::InvalidNymSignature))
    ));
}

#[test]
fn construction_rejects_bad_inputs() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let (keypair, ipk, sk, cred) = setup(&mut rng, "org1", 1);

    let mut new = |msp_id: &str,
                   ipk: Arc<IssuerPublicKey<Bls12_381>>,
                   sk: &UserSecretKey<Fr>,
                   ou: &str,
                   role_mask: u32| {
        IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
            &mut rng,
            msp_id,
            ipk,
            cred.clone(),
            sk.clone(),
            ou,
            role_mask,
        )
    };

    assert!(matches!(
        construction_error(new(MSP_ID, ipk.clone(), &sk, "org2", 1)),
        MspError::OrganizationalUnitMismatch
    ));
    assert!(matches!(
        construction_error(new(MSP_ID, ipk.clone(), &sk, "org1", 2)),
        MspError::RoleMismatch
    ));
    assert!(matches!(
        construction_error(new(MSP_ID, ipk.clone(), &sk, "org1", 0)),
        MspError::InvalidRoleMask(0)
    ));
    assert!(matches!(
        construction_error(new(MSP_ID, ipk.clone(), &sk, "org1", 32)),
        MspError::InvalidRoleMask(32)
    ));
    assert!(matches!(
        construction_error(new("", ipk.clone(), &sk, "org1", 1)),
        MspError::EmptyMspId
    ));

    let other_sk = UserSecretKey::<Fr>::new(&mut StdRng::seed_from_u64(1u64));
    assert!(matches!(
        construction_error(new(MSP_ID, ipk.clone(), &other_sk, "org1", 1)),
        MspError::Idemix(IdemixError::InvalidCredential)
    ));

    let mut tampered = keypair.public_key.clone();
    tampered.h_rand = tampered.h_sk;
    assert!(matches!(
        construction_error(new(MSP_ID, Arc::new(tampered), &sk, "org1", 1)),
        MspError::Idemix(IdemixError::IssuerKeyHashMismatch)
    ));
}

#[test]
fn issuer_key_must_be_for_ou_and_role() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let keypair = issuer_setup(&mut rng, &["OU", "Role", "EnrollmentID"]);
    let mut attrs = ou_role_attributes("org1", 1).to_vec();
    attrs.push(Fr::from(7u64));
    let (sk, cred) = issue_credential(&mut rng, &keypair, &attrs);
    assert!(matches!(
        construction_error(IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
            &mut rng,
            MSP_ID,
            Arc::new(keypair.public_key.clone()),
            cred,
            sk,
            "org1",
            1,
        )),
        MspError::UnexpectedAttributeNames
    ));

    let keypair = issuer_setup(&mut rng, &["Role", "OU"]);
    let (sk, cred) = issue_credential(&mut rng, &keypair, &ou_role_attributes("org1", 1));
    assert!(matches!(
        construction_error(IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
            &mut rng,
            MSP_ID,
            Arc::new(keypair.public_key.clone()),
            cred,
            sk,
            "org1",
            1,
        )),
        MspError::UnexpectedAttributeNames
    ));
}

#[test]
fn entry_points_with_existing_pseudonym_and_proof() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let (_, ipk, sk, cred) = setup(&mut rng, "org1", 1);

    let nym = Pseudonym::new(&mut rng, &sk, &ipk);
    let with_nym = IdemixSigningIdentity::<Bls12_381>::with_pseudonym::<_, Blake2b512>(
        &mut rng,
        MSP_ID,
        ipk.clone(),
        cred.clone(),
        sk.clone(),
        nym.clone(),
        "org1",
        1,
    )
    .unwrap();
    assert_eq!(with_nym.identity().nym(), &nym.nym);

    // Restoring the same identity from its proof
    let restored = IdemixSigningIdentity::<Bls12_381>::with_proof::<Blake2b512>(
        MSP_ID,
        ipk.clone(),
        cred.clone(),
        sk.clone(),
        nym.clone(),
        with_nym.proof().clone(),
        "org1",
        1,
    )
    .unwrap();
    assert_eq!(restored.serialize().unwrap(), with_nym.serialize().unwrap());
    let sig = restored.sign::<_, Blake2b512>(&mut rng, b"m").unwrap();
    with_nym.verify_signature::<Blake2b512>(b"m", &sig).unwrap();

    // A pseudonym that isn't for this user's key
    let foreign_sk = UserSecretKey::<Fr>::new(&mut rng);
    let foreign_nym = Pseudonym::new(&mut rng, &foreign_sk, &ipk);
    assert!(matches!(
        construction_error(
            IdemixSigningIdentity::<Bls12_381>::with_pseudonym::<_, Blake2b512>(
                &mut rng,
                MSP_ID,
                ipk.clone(),
                cred.clone(),
                sk.clone(),
                foreign_nym,
                "org1",
                1,
            )
        ),
        MspError::Idemix(IdemixError::InvalidPseudonym)
    ));

    // A proof made for a different pseudonym
    let other_nym = Pseudonym::new(&mut rng, &sk, &ipk);
    assert!(matches!(
        construction_error(IdemixSigningIdentity::<Bls12_381>::with_proof::<Blake2b512>(
            MSP_ID,
            ipk.clone(),
            cred.clone(),
            sk.clone(),
            other_nym,
            with_nym.proof().clone(),
            "org1",
            1,
        )),
        MspError::PseudonymMismatch
    ));

    // A proof for the pseudonym but over a different message
    let wrong_msg = Signature::new::<_, Blake2b512>(
        &mut rng,
        &cred,
        &sk,
        &nym,
        &ipk,
        &IDENTITY_DISCLOSURE,
        b"not empty",
    )
    .unwrap();
    assert!(matches!(
        construction_error(IdemixSigningIdentity::<Bls12_381>::with_proof::<Blake2b512>(
            MSP_ID, ipk, cred, sk, nym, wrong_msg, "org1", 1,
        )),
        MspError::Idemix(IdemixError::InvalidProof)
    ));
}

#[test]
fn tampered_serialized_identity_is_rejected() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let (_, ipk, sk, cred) = setup(&mut rng, "org1", 1);
    let signer = IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
        &mut rng,
        MSP_ID,
        ipk.clone(),
        cred.clone(),
        sk.clone(),
        "org1",
        1,
    )
    .unwrap();
    let serialized = signer.serialize().unwrap();
    let payload = SerializedIdemixIdentity::from_bytes(&serialized.id_bytes).unwrap();

    let repack = |payload: &SerializedIdemixIdentity| SerializedIdentity {
        msp_id: MSP_ID.to_string(),
        id_bytes: payload.to_bytes().unwrap(),
    };
    let parse = |s: &SerializedIdentity| {
        IdemixIdentity::<Bls12_381>::from_serialized::<Blake2b512>(s, ipk.clone())
    };
    assert!(parse(&repack(&payload)).is_ok());

    // Claiming to be an admin
    let mut admin = payload.clone();
    admin.role = 2u32.to_be_bytes().to_vec();
    assert!(matches!(
        parse(&repack(&admin)),
        Err(MspError::Idemix(IdemixError::RevealedAttributeMismatch(1)))
    ));

    let mut org2 = payload.clone();
    org2.ou = b"org2".to_vec();
    assert!(matches!(
        parse(&repack(&org2)),
        Err(MspError::Idemix(IdemixError::RevealedAttributeMismatch(0)))
    ));

    // Swapping in another pseudonym of the same user
    let other = Pseudonym::new(&mut rng, &sk, &ipk);
    let (x, y) = {
        use idemix_msp::serialized::NymCoordinates;
        other.nym.to_coordinates().unwrap()
    };
    let mut swapped = payload.clone();
    swapped.nym_x = x;
    swapped.nym_y = y;
    assert!(matches!(
        parse(&repack(&swapped)),
        Err(MspError::PseudonymMismatch)
    ));

    let mut off_curve = payload.clone();
    off_curve.nym_y = payload.nym_x.clone();
    assert!(matches!(
        parse(&repack(&off_curve)),
        Err(MspError::NymNotOnCurve)
    ));

    let mut truncated = payload.clone();
    truncated.proof.truncate(10);
    assert!(matches!(
        parse(&repack(&truncated)),
        Err(MspError::Serialization(_))
    ));

    let mut no_msp = repack(&payload);
    no_msp.msp_id = String::new();
    assert!(matches!(parse(&no_msp), Err(MspError::EmptyMspId)));

    // Another issuer
    let other_issuer = issuer_setup(&mut rng, &ATTRIBUTE_NAMES);
    assert!(IdemixIdentity::<Bls12_381>::from_serialized::<Blake2b512>(
        &serialized,
        Arc::new(other_issuer.public_key.clone())
    )
    .is_err());

    // Not an Idemix payload at all
    let garbage = SerializedIdentity {
        msp_id: MSP_ID.to_string(),
        id_bytes: vec![1, 2, 3],
    };
    assert!(parse(&garbage).is_err());
}

#[test]
fn signing_identity_dispatch() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let (_, ipk, sk, cred) = setup(&mut rng, "org1", 4);

    let anonymous: SigningIdentity<Bls12_381> =
        IdemixSigningIdentity::<Bls12_381>::new::<_, Blake2b512>(
            &mut rng, "Org1MSP", ipk.clone(), cred, sk, "org1", 4,
        )
        .unwrap()
        .into();
    let plain: SigningIdentity<Bls12_381> = PlainKeySigner::<G1>::new(&mut rng, "Org2MSP")
        .unwrap()
        .into();

    for (identity, msp_id) in [(&anonymous, "Org1MSP"), (&plain, "Org2MSP")] {
        assert_eq!(identity.msp_id(), msp_id);
        let sig = identity.sign::<_, Blake2b512>(&mut rng, b"tx-42").unwrap();
        identity
            .verify_signature::<Blake2b512>(b"tx-42", &sig)
            .unwrap();
        assert!(identity
            .verify_signature::<Blake2b512>(b"tx-0", &sig)
            .is_err());
        assert_eq!(identity.serialize().unwrap().msp_id, msp_id);
    }

    // A signature of one scheme doesn't pass as the other
    let plain_sig = plain.sign::<_, Blake2b512>(&mut rng, b"tx-42").unwrap();
    assert!(anonymous
        .verify_signature::<Blake2b512>(b"tx-42", &plain_sig)
        .is_err());

    // Remote verification of the plain identity
    let plain_sig = plain.sign::<_, Sha256>(&mut rng, b"tx-42").unwrap();
    verify_serialized::<G1, Sha256>(&plain.serialize().unwrap(), b"tx-42", &plain_sig).unwrap();

    let remote = IdemixIdentity::<Bls12_381>::from_serialized::<Blake2b512>(
        &anonymous.serialize().unwrap(),
        ipk,
    )
    .unwrap();
    assert_eq!(remote.roles(), vec![MspRole::Client]);
}
