macro_rules! id_gen {
    ($mod_name:ident) => {
        mod $mod_name {
            use once_cell::sync::Lazy;
            use std::{collections::HashSet, sync::Mutex};

            static ID_DATA: Lazy<Mutex<(HashSet<u32>, u32)>> = Lazy::new(|| Mutex::new((HashSet::new(), 1)));

            // Ids are never 0, so hosts can use 0 as "no barrier".
            pub(crate) fn next() -> u32 {
                let mut guard = ID_DATA.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let (id_set, counter) = &mut *guard;

                if id_set.len() == (u32::MAX - 1) as usize {
                    panic!("Out of ids");
                }

                while *counter == 0 || !id_set.insert(*counter) {
                    *counter = counter.wrapping_add(1);
                }

                let new_id = *counter;
                *counter = counter.wrapping_add(1);

                new_id
            }

            pub(crate) fn remove(id: u32) -> bool {
                ID_DATA
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .0
                    .remove(&id)
            }
        }
    };
}

pub(crate) use id_gen;
