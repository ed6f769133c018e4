use aes::cipher::consts::U16;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::typenum::Unsigned;
use aes::cipher::{BlockCipher, BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, BlockSizeUser, InvalidLength, KeyInit, KeyIvInit, StreamCipher};

use crate::types::BlockMode;

/// Any 128-bit block cipher the engine can drive through every [`BlockMode`].
pub trait Block128: BlockCipher + BlockEncrypt + BlockDecrypt + KeyInit + BlockSizeUser<BlockSize = U16> {}

impl<C> Block128 for C where C: BlockCipher + BlockEncrypt + BlockDecrypt + KeyInit + BlockSizeUser<BlockSize = U16> {}

/// Encrypts a block-aligned `buf` in place.
pub fn encrypt<C: Block128>(mode: BlockMode, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), InvalidLength> {
    match mode {
        BlockMode::Cbc => encrypt_blocks(cbc::Encryptor::<C>::new_from_slices(key, iv)?, buf),
        BlockMode::Cfb => encrypt_blocks(cfb_mode::Encryptor::<C>::new_from_slices(key, iv)?, buf),
        BlockMode::Ofb => ofb::Ofb::<C>::new_from_slices(key, iv)?.apply_keystream(buf),
        BlockMode::Ctr => ctr::Ctr128BE::<C>::new_from_slices(key, iv)?.apply_keystream(buf),
    }

    Ok(())
}

/// Decrypts `buf` in place. CBC needs a block-aligned `buf`; the other
/// modes take any length and treat a trailing partial block as keystream.
pub fn decrypt<C: Block128>(mode: BlockMode, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), InvalidLength> {
    match mode {
        BlockMode::Cbc => decrypt_blocks(cbc::Decryptor::<C>::new_from_slices(key, iv)?, buf),
        BlockMode::Cfb => cfb_mode::BufDecryptor::<C>::new_from_slices(key, iv)?.decrypt(buf),
        // OFB and CTR are keystream modes: decryption is the same XOR.
        BlockMode::Ofb => ofb::Ofb::<C>::new_from_slices(key, iv)?.apply_keystream(buf),
        BlockMode::Ctr => ctr::Ctr128BE::<C>::new_from_slices(key, iv)?.apply_keystream(buf),
    }

    Ok(())
}

fn encrypt_blocks<E: BlockEncryptMut>(mut encryptor: E, buf: &mut [u8]) {
    for block in buf.chunks_exact_mut(E::BlockSize::USIZE) {
        encryptor.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

fn decrypt_blocks<D: BlockDecryptMut>(mut decryptor: D, buf: &mut [u8]) {
    for block in buf.chunks_exact_mut(D::BlockSize::USIZE) {
        decryptor.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}
